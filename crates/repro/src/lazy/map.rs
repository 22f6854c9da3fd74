// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Lazy map access.

use super::{over, Lazy};
use crate::codec::map_entries;
use crate::descriptor::{Descriptor, MapDescriptor};
use crate::error::Result;
use crate::value::Value;

/// Map with eagerly decoded keys and lazily decoded values.
#[derive(Debug, Clone)]
pub struct LazyMap<'a> {
    value_desc: &'a Descriptor,
    bytes: &'a [u8],
    /// Key and absolute value position, in wire order.
    entries: Vec<(String, usize)>,
}

impl<'a> LazyMap<'a> {
    pub(crate) fn new(map: &'a MapDescriptor, bytes: &'a [u8], base: usize) -> Result<Self> {
        Ok(Self {
            value_desc: &map.value,
            bytes,
            entries: map_entries(map, bytes, base)?,
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Decode the value for `key`, or `None` if absent.
    pub fn get(&self, key: &str) -> Result<Option<Lazy<'a>>> {
        match self.entries.iter().find(|(k, _)| k == key) {
            Some((_, at)) => over(self.value_desc, self.bytes, *at).map(Some),
            None => Ok(None),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Result<Lazy<'a>>)> + '_ {
        self.entries
            .iter()
            .map(|(k, at)| (k.as_str(), over(self.value_desc, self.bytes, *at)))
    }

    pub fn to_value(&self) -> Result<Value> {
        let mut out = Vec::with_capacity(self.len());
        for (key, value) in self.iter() {
            out.push((key.to_string(), value?.to_value()?));
        }
        Ok(Value::Map(out))
    }
}
