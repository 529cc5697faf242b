//! Serde support: a `CircularBuffer` is a sequence in logical order.

use super::CircularBuffer;
use core::fmt;
use core::marker::PhantomData;
use serde::de::{self, Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

/// Upper bound on pre-reservation from an untrusted size hint.
const MAX_PREALLOC: usize = 4096;

impl<T: Serialize> Serialize for CircularBuffer<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

struct BufferVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for BufferVisitor<T> {
    type Value = CircularBuffer<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut buffer = CircularBuffer::new();
        if let Some(hint) = seq.size_hint() {
            buffer
                .try_reserve(hint.min(MAX_PREALLOC))
                .map_err(de::Error::custom)?;
        }
        while let Some(value) = seq.next_element()? {
            buffer
                .try_push_back(value)
                .map_err(|err| de::Error::custom(err.error))?;
        }
        Ok(buffer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for CircularBuffer<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(BufferVisitor(PhantomData))
    }
}
