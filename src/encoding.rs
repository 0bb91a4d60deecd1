//! Address identifier table and the index-keyed weight mapping sent to the
//! optimization service.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::distance_matrix::DistanceMatrix;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("address {address:?} appears more than once")]
    DuplicateAddress { address: String },
    #[error("address {address:?} is not in the identifier table")]
    UnknownAddress { address: String },
}

/// Strict parse failure for `"(u, v)"` pair text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier pair {text:?}: expected \"(u, v)\"")]
pub struct PairParseError {
    pub text: String,
}

/// Bijection between the request's addresses and the dense range `0..N`.
///
/// Identifier `i` is the address at position `i` of the input list.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressTable {
    addresses: Vec<String>,
    ids: HashMap<String, usize>,
}

impl AddressTable {
    pub fn new(addresses: Vec<String>) -> Result<Self, EncodeError> {
        let mut ids = HashMap::with_capacity(addresses.len());
        for (i, address) in addresses.iter().enumerate() {
            if ids.insert(address.clone(), i).is_some() {
                return Err(EncodeError::DuplicateAddress {
                    address: address.clone(),
                });
            }
        }
        Ok(Self { addresses, ids })
    }

    pub fn id_of(&self, address: &str) -> Option<usize> {
        self.ids.get(address).copied()
    }

    pub fn address_of(&self, id: usize) -> Option<&str> {
        self.addresses.get(id).map(String::as_str)
    }

    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    fn require(&self, address: &str) -> Result<usize, EncodeError> {
        self.id_of(address).ok_or_else(|| EncodeError::UnknownAddress {
            address: address.to_string(),
        })
    }
}

/// Undirected edge between two identifiers, stored as `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(usize, usize);

impl EdgeKey {
    pub fn new(u: usize, v: usize) -> Self {
        if u <= v { Self(u, v) } else { Self(v, u) }
    }

    pub fn low(&self) -> usize {
        self.0
    }

    pub fn high(&self) -> usize {
        self.1
    }
}

impl From<(usize, usize)> for EdgeKey {
    fn from((u, v): (usize, usize)) -> Self {
        Self::new(u, v)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

impl FromStr for EdgeKey {
    type Err = PairParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_pair(text).map(Self::from)
    }
}

impl Serialize for EdgeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EdgeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse `"(u, v)"` keeping the written orientation.
///
/// Whitespace around either number is allowed; anything else is rejected.
pub fn parse_pair(text: &str) -> Result<(usize, usize), PairParseError> {
    let err = || PairParseError {
        text: text.to_string(),
    };

    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(err)?;

    let mut parts = inner.split(',');
    let (Some(u), Some(v), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(err());
    };

    let u = parse_id(u).ok_or_else(err)?;
    let v = parse_id(v).ok_or_else(err)?;
    Ok((u, v))
}

/// Plain decimal identifier, surrounding whitespace allowed. Signs are not.
pub(crate) fn parse_id(text: &str) -> Option<usize> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Distances keyed by identifier pairs, serialized as `{"(i, j)": weight}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedWeights(BTreeMap<EdgeKey, f64>);

impl EncodedWeights {
    pub fn insert(&mut self, key: EdgeKey, weight: f64) {
        self.0.insert(key, weight);
    }

    pub fn get(&self, key: EdgeKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeKey, f64)> + '_ {
        self.0.iter().map(|(key, weight)| (*key, *weight))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Replace each address of every matrix entry with its identifier.
pub fn encode_weights(matrix: &DistanceMatrix, table: &AddressTable) -> Result<EncodedWeights, EncodeError> {
    let mut weights = EncodedWeights::default();
    for (pair, distance) in matrix.iter() {
        let u = table.require(&pair.origin)?;
        let v = table.require(&pair.destination)?;
        weights.insert(EdgeKey::new(u, v), distance);
    }
    Ok(weights)
}
