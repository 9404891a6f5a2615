//! JSON interchange for Qoid trees.
//!
//! Every node maps to a single-key JSON object (a property to a pair):
//!
//! | Node | JSON |
//! |---|---|
//! | Property | `["tag", "value"]` |
//! | Qoid | `{"tag": [["t1", "t2"], ["v1", "v2"]]}` |
//! | Collection | `{"tag": [qoid, ...]}` |
//! | Register | `{"tag": [child, ...]}` |
//!
//! Qoid properties travel as two parallel lists so duplicate tags survive.
//! Inside a register, a nested register child is keyed `"/ tag"` (mirroring
//! its markup header) while a collection child uses its bare tag.
//!
//! ## Examples
//!
//! ```rust
//! use qoid::{from_json, qoid, to_json, Qoid};
//!
//! let qoid = qoid!("tag"; "tag1" => "val1", "tag1" => "val2");
//! let json = to_json(&qoid).unwrap();
//! assert_eq!(json, r#"{"tag":[["tag1","tag1"],["val1","val2"]]}"#);
//!
//! let back: Qoid = from_json(&json).unwrap();
//! assert_eq!(back, qoid);
//! ```

use crate::node::Tagged;
use crate::{Collection, Container, Entry, Property, Qoid, Register};
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, SerializeTuple, Serializer};
use std::fmt;

const REGISTER_PREFIX: &str = "/";

/// Reads the only entry of a single-key object.
fn single_entry<'de, A, V>(mut map: A) -> Result<(String, V), A::Error>
where
    A: MapAccess<'de>,
    V: Deserialize<'de>,
{
    let (tag, value) = map
        .next_entry::<String, V>()?
        .ok_or_else(|| de::Error::invalid_length(0, &"a single-key object"))?;
    if map.next_key::<IgnoredAny>()?.is_some() {
        return Err(de::Error::invalid_length(2, &"a single-key object"));
    }
    Ok((tag, value))
}

/// Strips the `/` marker from a nested register key.
fn register_tag(key: &str) -> Option<&str> {
    key.strip_prefix(REGISTER_PREFIX).map(str::trim_start)
}

impl Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(self.tag())?;
        tuple.serialize_element(self.value())?;
        tuple.end()
    }
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (tag, value) = <(String, String)>::deserialize(deserializer)?;
        Ok(Property::new(tag, value))
    }
}

struct Parallel<'a>(&'a Qoid);

impl Serialize for Parallel<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.0.tags())?;
        seq.serialize_element(&self.0.values())?;
        seq.end()
    }
}

impl Serialize for Qoid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.tag(), &Parallel(self))?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Qoid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct QoidVisitor;

        impl<'de> Visitor<'de> for QoidVisitor {
            type Value = Qoid;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a qoid object {"tag": [[tags...], [values...]]}"#)
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (tag, (tags, values)) = single_entry::<A, (Vec<String>, Vec<String>)>(map)?;
                if tags.len() != values.len() {
                    return Err(de::Error::custom(format!(
                        "qoid '{}' has {} tags but {} values",
                        tag,
                        tags.len(),
                        values.len()
                    )));
                }
                Ok(Qoid::with_properties(
                    tag,
                    tags.into_iter().zip(values).map(|(t, v)| Property::new(t, v)),
                ))
            }
        }

        deserializer.deserialize_map(QoidVisitor)
    }
}

struct Items<'a, T>(&'a [T]);

impl<T: Serialize> Serialize for Items<'_, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl Serialize for Collection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.tag(), &Items(&self.children()[..]))?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CollectionVisitor;

        impl<'de> Visitor<'de> for CollectionVisitor {
            type Value = Collection;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a collection object {"tag": [qoids...]}"#)
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (tag, qoids) = single_entry::<A, Vec<Qoid>>(map)?;
                Ok(Collection::with_qoids(tag, qoids))
            }
        }

        deserializer.deserialize_map(CollectionVisitor)
    }
}

impl Serialize for Entry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Entry::Collection(collection) if register_tag(collection.tag()).is_some() => {
                Err(ser::Error::custom(format!(
                    "collection tag '{}' inside a register cannot start with '{}'",
                    collection.tag(),
                    REGISTER_PREFIX
                )))
            }
            Entry::Collection(collection) => collection.serialize(serializer),
            Entry::Register(register) => {
                let key = format!("{} {}", REGISTER_PREFIX, register.tag());
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(&key, &Items(&register.children()[..]))?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = Entry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a collection object or a \"/ tag\" register object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let key: String = map
                    .next_key()?
                    .ok_or_else(|| de::Error::invalid_length(0, &"a single-key object"))?;
                let entry = match register_tag(&key) {
                    Some(tag) => {
                        let entries: Vec<Entry> = map.next_value()?;
                        Entry::Register(Register::with_entries(tag, entries))
                    }
                    None => {
                        let qoids: Vec<Qoid> = map.next_value()?;
                        Entry::Collection(Collection::with_qoids(key, qoids))
                    }
                };
                if map.next_key::<IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &"a single-key object"));
                }
                Ok(entry)
            }
        }

        deserializer.deserialize_map(EntryVisitor)
    }
}

impl Serialize for Register {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.tag(), &Items(&self.children()[..]))?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Register {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RegisterVisitor;

        impl<'de> Visitor<'de> for RegisterVisitor {
            type Value = Register;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"a register object {"tag": [children...]}"#)
            }

            fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (tag, entries) = single_entry::<A, Vec<Entry>>(map)?;
                Ok(Register::with_entries(tag, entries))
            }
        }

        deserializer.deserialize_map(RegisterVisitor)
    }
}
