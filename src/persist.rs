//! Filesystem persistence for collections (files) and registers (folders).
//!
//! ## Path resolution
//!
//! A node's save target is resolved in priority order:
//!
//! 1. inside a register: the register's folder joined with
//!    [`default_name`] of the node's tag (see [`Register::child_path`])
//! 2. the explicit `path`
//! 3. the `source` it was loaded from
//! 4. [`default_name`] of its tag, relative to the working directory
//!
//! A node owned by a register has no standalone target: [`Persist::resolve_path`]
//! and [`Persist::save`] fail with [`Error::Attached`] and the owner saves it.
//!
//! ## Extensions
//!
//! Collection files end in `.cxr`, `.meta` or `.txt`; register folders end
//! in `.cxr`. [`default_name`] appends `.cxr` to a tag lacking one of these.
//! Explicit paths are never rewritten.
//!
//! A tag-derived name must be a single path component, so a child never
//! lands outside its register's folder. Children whose names collide make
//! the whole save fail before anything is written.
//!
//! ## Examples
//!
//! ```rust
//! use qoid::{default_name, Collection, Container, Persist, Register, Storage};
//! use std::path::PathBuf;
//!
//! assert_eq!(default_name("data", Storage::File).unwrap(), PathBuf::from("data.cxr"));
//! assert_eq!(default_name("notes.txt", Storage::File).unwrap(), PathBuf::from("notes.txt"));
//! assert!(default_name("../up", Storage::File).is_err());
//!
//! let standalone = Collection::new("y").with_source("/x/y.cxr");
//! assert_eq!(standalone.resolve_path().unwrap(), PathBuf::from("/x/y.cxr"));
//!
//! let mut register = Register::new("r").with_path("/r.cxr");
//! register.append(standalone);
//! assert_eq!(register.child_path("y").unwrap(), PathBuf::from("/r.cxr/y.cxr"));
//! ```

use crate::container::Key;
use crate::de::Parser;
use crate::node::Tagged;
use crate::{Collection, Container, Entry, Error, QoidOptions, Register, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::instrument;
use walkdir::WalkDir;

/// Extensions a collection file may carry.
pub const COLLECTION_EXTENSIONS: [&str; 3] = ["cxr", "meta", "txt"];

/// Extension a register folder must carry.
pub const REGISTER_EXTENSION: &str = "cxr";

/// Extension appended to tag-derived names.
pub const DEFAULT_EXTENSION: &str = "cxr";

/// How a node is laid out on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Storage {
    /// One file (collections).
    File,
    /// One folder (registers).
    Folder,
}

impl Storage {
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Storage::File => &COLLECTION_EXTENSIONS,
            Storage::Folder => &[REGISTER_EXTENSION],
        }
    }

    /// Whether `path` carries an extension recognized for this storage.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qoid::Storage;
    /// use std::path::Path;
    ///
    /// assert!(Storage::File.accepts(Path::new("a.meta")));
    /// assert!(!Storage::Folder.accepts(Path::new("a.meta")));
    /// assert!(!Storage::File.accepts(Path::new("c.bin")));
    /// ```
    #[must_use]
    pub fn accepts(self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map_or(false, |ext| self.extensions().contains(&ext))
    }
}

/// File or folder name derived from a tag: the tag itself when it already
/// carries a recognized extension, otherwise the tag plus `.cxr`.
///
/// # Errors
///
/// [`Error::InvalidName`] unless the tag is exactly one plain path
/// component. Empty tags, `.`, `..`, absolute tags and tags holding a
/// separator are rejected.
pub fn default_name(tag: &str, storage: Storage) -> Result<PathBuf> {
    let name = PathBuf::from(tag);
    let mut components = name.components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single || tag.contains(['/', '\\']) {
        return Err(Error::invalid_name(tag));
    }
    if storage.accepts(&name) {
        Ok(name)
    } else {
        Ok(PathBuf::from(format!("{tag}.{DEFAULT_EXTENSION}")))
    }
}

fn resolve(
    storage: Storage,
    tag: &str,
    parent_dir: Option<&Path>,
    path: Option<&Path>,
    source: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(dir) = parent_dir {
        return Ok(dir.join(default_name(tag, storage)?));
    }
    match path.or(source) {
        Some(path) => Ok(path.to_path_buf()),
        None => default_name(tag, storage),
    }
}

/// Tag of a node loaded from `path`: its file or folder name.
fn file_tag(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn not_a(path: &Path, what: &str) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        msg: format!("not a {what}"),
    }
}

/// Load and save for the two persistable node kinds.
pub trait Persist: Tagged + Serialize + DeserializeOwned + Sized {
    const STORAGE: Storage;

    /// Explicit save target.
    fn path(&self) -> Option<&Path>;

    /// Path the node was loaded from.
    fn source(&self) -> Option<&Path>;

    /// Reads a node from disk with non-default markup options.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`], [`Error::UnsupportedExtension`], [`Error::Io`] or
    /// [`Error::Format`].
    fn open_with(path: impl AsRef<Path>, options: &QoidOptions) -> Result<Self>;

    /// Writes the node to exactly `path`, creating directories as needed.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if any write fails. Already written files are kept.
    fn write_to(&self, path: &Path, options: &QoidOptions) -> Result<()>;

    /// Reads a node from disk.
    ///
    /// # Errors
    ///
    /// See [`Persist::open_with`].
    fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, &QoidOptions::default())
    }

    /// Standalone save target: explicit path, else source, else the
    /// tag-derived default name.
    ///
    /// # Errors
    ///
    /// [`Error::Attached`] if the node is owned by a register,
    /// [`Error::InvalidName`] if the path falls back to a tag that is not a
    /// plain file name.
    fn resolve_path(&self) -> Result<PathBuf> {
        if self.has_parent() {
            return Err(Error::Attached(self.tag().to_string()));
        }
        resolve(Self::STORAGE, self.tag(), None, self.path(), self.source())
    }

    /// Save target inside the folder `dir` of an owning register.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidName`], see [`default_name`].
    fn resolve_path_in(&self, dir: &Path) -> Result<PathBuf> {
        resolve(Self::STORAGE, self.tag(), Some(dir), self.path(), self.source())
    }

    /// Saves to the resolved path and returns it.
    ///
    /// # Errors
    ///
    /// See [`Persist::save_with`].
    fn save(&self) -> Result<PathBuf> {
        self.save_with(&QoidOptions::default())
    }

    /// # Errors
    ///
    /// [`Error::Attached`] for a node owned by a register,
    /// [`Error::UnsupportedExtension`] for an explicit path or source with
    /// an unrecognized extension, [`Error::InvalidName`] for a child tag that
    /// is not a plain file name, [`Error::Io`] when two children resolve to
    /// the same path or on write failure.
    fn save_with(&self, options: &QoidOptions) -> Result<PathBuf> {
        let path = self.resolve_path()?;
        if !Self::STORAGE.accepts(&path) {
            return Err(Error::unsupported_extension(&path));
        }
        self.write_to(&path, options)?;
        tracing::info!("Saved {} '{}' to {}", self.kind(), self.tag(), path.display());
        Ok(path)
    }

    /// Writes the JSON form next to the resolved path, as `<path>.json`.
    ///
    /// # Errors
    ///
    /// [`Error::Attached`] or [`Error::Io`].
    fn save_json(&self, options: &QoidOptions) -> Result<PathBuf> {
        let mut target = self.resolve_path()?.into_os_string();
        target.push(".json");
        let target = PathBuf::from(target);

        let json = if options.pretty {
            crate::to_json_pretty(self)?
        } else {
            crate::to_json(self)?
        };
        create_parent(&target)?;
        fs::write(&target, json).map_err(|e| Error::io(&target, &e))?;
        tracing::info!("Saved {} '{}' as JSON to {}", self.kind(), self.tag(), target.display());
        Ok(target)
    }

    /// Reads a node from a JSON file; the tag comes from the document.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`], [`Error::Io`] or [`Error::MalformedDocument`].
    fn open_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        crate::from_json(&json)
    }
}

fn create_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, &e))
        }
        _ => Ok(()),
    }
}

impl Persist for Collection {
    const STORAGE: Storage = Storage::File;

    fn path(&self) -> Option<&Path> {
        Collection::path(self)
    }

    fn source(&self) -> Option<&Path> {
        Collection::source(self)
    }

    fn open_with(path: impl AsRef<Path>, options: &QoidOptions) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| Error::io(path, &e))?;
        if metadata.is_dir() {
            return Err(not_a(path, "file"));
        }
        if !Self::STORAGE.accepts(path) {
            return Err(Error::unsupported_extension(path));
        }
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, &e))?;
        let mut collection = Parser::with_options(&text, options).parse_collection(file_tag(path))?;
        collection.set_source(path);
        tracing::debug!("Loaded collection from {}", path.display());
        Ok(collection)
    }

    fn write_to(&self, path: &Path, options: &QoidOptions) -> Result<()> {
        create_parent(path)?;
        fs::write(path, crate::to_string_with_options(self, options))
            .map_err(|e| Error::io(path, &e))
    }
}

impl Persist for Register {
    const STORAGE: Storage = Storage::Folder;

    fn path(&self) -> Option<&Path> {
        Register::path(self)
    }

    fn source(&self) -> Option<&Path> {
        Register::source(self)
    }

    fn open_with(path: impl AsRef<Path>, options: &QoidOptions) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| Error::io(path, &e))?;
        if !Self::STORAGE.accepts(path) {
            return Err(Error::unsupported_extension(path));
        }
        if !metadata.is_dir() {
            return Err(not_a(path, "directory"));
        }
        let register = load_register(path, options)?;
        tracing::info!("Opened register '{}' from {}", register.tag(), path.display());
        Ok(register)
    }

    fn write_to(&self, path: &Path, options: &QoidOptions) -> Result<()> {
        self.check_layout(path)?;
        self.write_tree(path, options)
    }
}

/// Loads `dir` and its `.cxr` sub-folders, skipping unrecognized entries.
#[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
fn load_register(dir: &Path, options: &QoidOptions) -> Result<Register> {
    let mut register = Register::new(file_tag(dir));
    register.set_source(dir);

    for item in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let item = item.map_err(|e| Error::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            msg: e.to_string(),
        })?;
        let path = item.path();
        if item.file_type().is_dir() {
            if Storage::Folder.accepts(path) {
                register.append(load_register(path, options)?);
            } else {
                tracing::debug!("Skipping folder {}", path.display());
            }
        } else if Storage::File.accepts(path) {
            register.append(Collection::open_with(path, options)?);
        } else {
            tracing::debug!("Skipping unsupported file {}", path.display());
        }
    }
    Ok(register)
}

impl Entry {
    /// Save target of this entry inside the folder `dir`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidName`], see [`default_name`].
    pub fn resolve_path_in(&self, dir: &Path) -> Result<PathBuf> {
        match self {
            Entry::Collection(c) => c.resolve_path_in(dir),
            Entry::Register(r) => r.resolve_path_in(dir),
        }
    }
}

impl Register {
    /// Resolves every descendant under `dir`, failing on a name that is not
    /// a plain file name or on two siblings that share a target.
    fn check_layout(&self, dir: &Path) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in self.iter() {
            let path = entry.resolve_path_in(dir)?;
            if !seen.insert(path.clone()) {
                return Err(Error::Io {
                    path,
                    msg: format!("two children of '{}' resolve to this path", self.tag()),
                });
            }
            if let Entry::Register(register) = entry {
                register.check_layout(&path)?;
            }
        }
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    fn write_tree(&self, dir: &Path, options: &QoidOptions) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, &e))?;
        for entry in self.iter() {
            let path = entry.resolve_path_in(dir)?;
            match entry {
                Entry::Collection(collection) => collection.write_to(&path, options)?,
                Entry::Register(register) => register.write_tree(&path, options)?,
            }
        }
        Ok(())
    }

    /// Path of the descendant reached by following `keys` from this
    /// register, resolved top-down from this register's own target.
    ///
    /// # Errors
    ///
    /// [`Error::Attached`] if this register is itself owned,
    /// [`Error::OutOfRange`]/[`Error::KeyNotFound`] for a bad key,
    /// [`Error::InvalidName`] for a tag that is not a plain file name and
    /// [`Error::TypeMismatch`] when a key other than the last resolves to a
    /// collection.
    pub fn path_of(&self, keys: &[Key<'_>]) -> Result<PathBuf> {
        let mut dir = self.resolve_path()?;
        let mut current = self;
        for (depth, key) in keys.iter().enumerate() {
            let entry = current.get(*key)?;
            dir = entry.resolve_path_in(&dir)?;
            if depth + 1 == keys.len() {
                break;
            }
            current = entry
                .as_register()
                .ok_or_else(|| Error::type_mismatch("register", entry.kind()))?;
        }
        Ok(dir)
    }

    /// Path of the direct child identified by `key`.
    ///
    /// # Errors
    ///
    /// See [`Register::path_of`].
    pub fn child_path<'k>(&self, key: impl Into<Key<'k>>) -> Result<PathBuf> {
        self.path_of(&[key.into()])
    }
}
