//! Core types, constants, and error taxonomy for agora.
//!
//! This crate provides the foundational pieces shared across the agora
//! workspace:
//!
//! - [`ID`] — Typed wrapper over compact random entity identifiers
//! - [`Unique`] — Identity trait for domain entities
//! - [`Fault`] — Error taxonomy with HTTP status mapping
//! - [`log()`] — Dual terminal/file logger initialization

mod fault;

pub use fault::*;

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

/// Alphabet for generated entity identifiers.
pub const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
/// Length of generated entity identifiers.
pub const ID_LENGTH: usize = 12;

/// Generic ID wrapper providing compile-time type safety over the
/// compact random identifiers used for user-facing entities.
///
/// Freshly generated IDs draw [`ID_LENGTH`] characters from the
/// 62-character [`ID_ALPHABET`]. Collisions are not checked; at the
/// scale this system targets the probability is negligible.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ID<T> {
    inner: String,
    #[serde(skip)]
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn as_str(&self) -> &str {
        &self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying string.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<String> for ID<T> {
    fn from(inner: String) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}
impl<T> From<ID<T>> for String {
    fn from(id: ID<T>) -> Self {
        id.inner
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        use rand::Rng;
        let mut rng = rand::rng();
        let inner = (0..ID_LENGTH)
            .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            marker: PhantomData,
        }
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn generated_ids_have_fixed_length() {
        for _ in 0..64 {
            let id = ID::<Marker>::default();
            assert_eq!(id.as_str().len(), ID_LENGTH);
            assert!(id.as_str().bytes().all(|b| ID_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = ID::<Marker>::default();
        let b = ID::<Marker>::default();
        assert_ne!(a, b);
    }

    #[test]
    fn id_round_trips_through_serde() {
        let id = ID::<Marker>::from(String::from("abcDEF123456"));
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abcDEF123456\"");
        let back: ID<Marker> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
