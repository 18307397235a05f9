// SPDX-License-Identifier: MIT OR Apache-2.0
//! Parameter keys and the capture file name codec.
//!
//! Every benchmark capture is stored in a file whose name encodes the
//! parameter combination it was measured with:
//!
//! ```text
//! <impl>__<dataset size>__<total readers>__<active readers>__<writers>[__<read kind>][.<trial>]
//! ```
//!
//! The trial suffix keeps repeated runs of the same combination apart on
//! disk but is not part of the key's identity.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Delimiter between key fields in a capture file name
pub const FIELD_DELIMITER: &str = "__";

/// Delimiter between the encoded key and the trial suffix
pub const TRIAL_DELIMITER: char = '.';

/// The identity of one measured parameter combination.
///
/// Equality, ordering and hashing are derived field by field, so two
/// captures decoded from differently suffixed file names compare equal when
/// their parameters match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ParameterKey {
    implementation: String,
    dataset_size: u64,
    total_readers: u32,
    active_readers: u32,
    writers: u32,
    read_kind: Option<String>,
}

impl ParameterKey {
    /// Create a key without a read-operation kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if `implementation` is not a legal
    /// file name token.
    pub fn new(
        implementation: impl Into<String>,
        dataset_size: u64,
        total_readers: u32,
        active_readers: u32,
        writers: u32,
    ) -> Result<Self> {
        let implementation = implementation.into();
        check_token(&implementation)
            .map_err(|reason| Error::malformed_key(&implementation, reason))?;
        Ok(Self {
            implementation,
            dataset_size,
            total_readers,
            active_readers,
            writers,
            read_kind: None,
        })
    }

    /// Attach a read-operation kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if `kind` is not a legal file name token.
    pub fn with_read_kind(mut self, kind: impl Into<String>) -> Result<Self> {
        let kind = kind.into();
        check_token(&kind).map_err(|reason| Error::malformed_key(&kind, reason))?;
        self.read_kind = Some(kind);
        Ok(self)
    }

    /// Name of the benchmarked implementation (the binary name)
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    /// Number of elements in the benchmarked data set
    #[must_use]
    pub const fn dataset_size(&self) -> u64 {
        self.dataset_size
    }

    /// Number of slow readers that read the whole data set
    #[must_use]
    pub const fn total_readers(&self) -> u32 {
        self.total_readers
    }

    /// Number of active reader threads
    #[must_use]
    pub const fn active_readers(&self) -> u32 {
        self.active_readers
    }

    /// Number of writer threads
    #[must_use]
    pub const fn writers(&self) -> u32 {
        self.writers
    }

    /// Read-operation kind, when the sweep varies it
    #[must_use]
    pub fn read_kind(&self) -> Option<&str> {
        self.read_kind.as_deref()
    }

    /// Positional arguments passed to the benchmark binary for this key
    #[must_use]
    pub fn benchmark_args(&self) -> Vec<String> {
        let mut args = vec![
            self.dataset_size.to_string(),
            self.total_readers.to_string(),
            self.active_readers.to_string(),
            self.writers.to_string(),
        ];
        if let Some(kind) = &self.read_kind {
            args.push(kind.clone());
        }
        args
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} size={} all={} readers={} writers={}",
            self.implementation,
            self.dataset_size,
            self.total_readers,
            self.active_readers,
            self.writers
        )?;
        if let Some(kind) = &self.read_kind {
            write!(f, " kind={kind}")?;
        }
        Ok(())
    }
}

/// Number of parameter fields a sweep encodes into its file names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyLayout {
    /// `impl__size__all__readers__writers`
    #[default]
    Basic,
    /// `impl__size__all__readers__writers__kind`
    WithReadKind,
}

impl KeyLayout {
    /// Number of parameter fields after the implementation name
    #[must_use]
    pub const fn parameter_fields(self) -> usize {
        match self {
            Self::Basic => 4,
            Self::WithReadKind => 5,
        }
    }

    /// Total number of tokens, including the implementation name
    #[must_use]
    pub const fn token_count(self) -> usize {
        self.parameter_fields() + 1
    }
}

/// Bidirectional mapping between [`ParameterKey`] and file name tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyCodec {
    layout: KeyLayout,
}

impl KeyCodec {
    /// Create a codec for the given layout
    #[must_use]
    pub const fn new(layout: KeyLayout) -> Self {
        Self { layout }
    }

    /// The layout this codec reads and writes
    #[must_use]
    pub const fn layout(&self) -> KeyLayout {
        self.layout
    }

    /// Encode a key into its ordered token sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] when the key's read kind does not fit
    /// the codec's layout, since such a key could not be decoded again.
    pub fn encode(&self, key: &ParameterKey) -> Result<Vec<String>> {
        let mut tokens = Vec::with_capacity(self.layout.token_count());
        tokens.push(key.implementation.clone());
        tokens.push(key.dataset_size.to_string());
        tokens.push(key.total_readers.to_string());
        tokens.push(key.active_readers.to_string());
        tokens.push(key.writers.to_string());
        match (self.layout, &key.read_kind) {
            (KeyLayout::Basic, None) => {}
            (KeyLayout::WithReadKind, Some(kind)) => tokens.push(kind.clone()),
            (KeyLayout::Basic, Some(_)) => {
                return Err(Error::malformed_key(
                    key.to_string(),
                    "read kind present but layout has no read kind field",
                ));
            }
            (KeyLayout::WithReadKind, None) => {
                return Err(Error::malformed_key(
                    key.to_string(),
                    "layout requires a read kind",
                ));
            }
        }
        Ok(tokens)
    }

    /// Decode an ordered token sequence into a key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if the arity is wrong, a numeric field
    /// is not an unsigned integer, or a string field is not a legal token.
    pub fn decode(&self, tokens: &[&str]) -> Result<ParameterKey> {
        let input = tokens.join(FIELD_DELIMITER);
        let expected = self.layout.token_count();
        if tokens.len() != expected {
            return Err(Error::malformed_key(
                input,
                format!("expected {expected} fields, found {}", tokens.len()),
            ));
        }

        let malformed = |reason: String| Error::malformed_key(&input, reason);
        let key = ParameterKey::new(
            tokens[0],
            parse_field(tokens[1], "dataset size").map_err(malformed)?,
            parse_field(tokens[2], "total readers").map_err(malformed)?,
            parse_field(tokens[3], "active readers").map_err(malformed)?,
            parse_field(tokens[4], "writers").map_err(malformed)?,
        )
        .map_err(|_| malformed(format!("invalid implementation name {:?}", tokens[0])))?;

        match self.layout {
            KeyLayout::Basic => Ok(key),
            KeyLayout::WithReadKind => key
                .with_read_kind(tokens[5])
                .map_err(|_| malformed(format!("invalid read kind {:?}", tokens[5]))),
        }
    }

    /// File name for one trial of `key`.
    ///
    /// # Errors
    ///
    /// See [`KeyCodec::encode`].
    pub fn file_name(&self, key: &ParameterKey, trial: u32) -> Result<String> {
        let stem = self.encode(key)?.join(FIELD_DELIMITER);
        Ok(format!("{stem}{TRIAL_DELIMITER}{trial}"))
    }

    /// Decode a capture file name, ignoring its trial suffix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedKey`] if the name does not decode.
    pub fn parse_file_name(&self, name: &str) -> Result<ParameterKey> {
        let stem = match name.rsplit_once(TRIAL_DELIMITER) {
            Some((stem, suffix)) if !stem.is_empty() && !suffix.is_empty() => stem,
            Some(_) => return Err(Error::malformed_key(name, "empty stem or trial suffix")),
            None => name,
        };
        let tokens: Vec<&str> = stem.split(FIELD_DELIMITER).collect();
        self.decode(&tokens).map_err(|err| match err {
            Error::MalformedKey { reason, .. } => Error::malformed_key(name, reason),
            other => other,
        })
    }
}

fn parse_field<T: std::str::FromStr>(token: &str, field: &str) -> Result<T, String> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("{field} {token:?} is not an unsigned integer"));
    }
    token
        .parse()
        .map_err(|_| format!("{field} {token:?} is out of range"))
}

/// Check that `token` can be embedded in a file name without ambiguity.
fn check_token(token: &str) -> Result<(), String> {
    if token.is_empty() {
        return Err("empty token".to_string());
    }
    if token.contains(FIELD_DELIMITER) {
        return Err(format!("token {token:?} contains {FIELD_DELIMITER:?}"));
    }
    if token.starts_with('_') || token.ends_with('_') {
        return Err(format!("token {token:?} starts or ends with '_'"));
    }
    if let Some(c) = token
        .chars()
        .find(|&c| c == TRIAL_DELIMITER || c == '/' || c == '\\' || c.is_whitespace())
    {
        return Err(format!("token {token:?} contains reserved character {c:?}"));
    }
    Ok(())
}
