//! Map/reduce views over JSON documents.
//!
//! A view maps every document to zero or more `(key, value)` rows. Stores evaluate views with a
//! [`ViewRegistry`] and answer [`ViewQuery`]s at a [`ViewName`] address.

use std::collections::HashMap;

use derive_more::Display;
use serde_json::{json, Value};
use thiserror::Error;

use crate::address::{DocId, ViewName};

mod collate;
pub mod standard;

pub use collate::collate;

#[derive(Display, Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[display(fmt = "unknown view {}", _0)]
    UnknownView(String),
    #[display(fmt = "view {} has no reduce function", _0)]
    NoReduce(String),
}

/// Emits the `(key, value)` rows of a document.
pub type MapFn = fn(&Value) -> Vec<(Value, Value)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reduce {
    /// The number of matching rows.
    Count,
    /// The sum of the numeric row values.
    Sum,
}

impl Reduce {
    pub fn apply(self, rows: &[ViewRow]) -> Value {
        match self {
            Reduce::Count => json!(rows.len()),
            Reduce::Sum => {
                if rows.iter().all(|row| row.value.is_u64() || row.value.is_null()) {
                    json!(rows.iter().filter_map(|row| row.value.as_u64()).sum::<u64>())
                } else {
                    json!(rows.iter().filter_map(|row| row.value.as_f64()).sum::<f64>())
                }
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub name: ViewName,
    pub map: MapFn,
    pub reduce: Option<Reduce>,
}

impl View {
    pub fn new(name: ViewName, map: MapFn) -> Self {
        View {
            name,
            map,
            reduce: None,
        }
    }

    pub fn counted(name: ViewName, map: MapFn) -> Self {
        View {
            name,
            map,
            reduce: Some(Reduce::Count),
        }
    }

    pub fn summed(name: ViewName, map: MapFn) -> Self {
        View {
            name,
            map,
            reduce: Some(Reduce::Sum),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    pub key: Option<Value>,
    /// Matches array keys starting with these elements.
    pub key_prefix: Option<Vec<Value>>,
    pub limit: Option<usize>,
    pub skip: usize,
    pub descending: bool,
    pub reduce: bool,
    pub include_docs: bool,
}

impl ViewQuery {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn key(mut self, key: Value) -> Self {
        self.key = Some(key);
        self
    }

    pub fn key_prefix(mut self, prefix: Vec<Value>) -> Self {
        self.key_prefix = Some(prefix);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    pub fn reduce(mut self) -> Self {
        self.reduce = true;
        self
    }

    pub fn include_docs(mut self) -> Self {
        self.include_docs = true;
        self
    }

    pub fn matches(&self, key: &Value) -> bool {
        if let Some(expected) = &self.key {
            if collate(expected, key).is_ne() {
                return false;
            }
        }

        if let Some(prefix) = &self.key_prefix {
            let Some(key) = key.as_array() else {
                return false;
            };
            if key.len() < prefix.len()
                || prefix.iter().zip(key).any(|(p, k)| collate(p, k).is_ne())
            {
                return false;
            }
        }

        true
    }

    /// Applies `skip` and `limit` to already ordered rows.
    pub fn paginate(&self, rows: Vec<ViewRow>) -> Vec<ViewRow> {
        rows.into_iter()
            .skip(self.skip)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    /// The document that emitted the row. `None` for reduced rows.
    pub id: Option<DocId>,
    pub key: Value,
    pub value: Value,
    pub doc: Option<Value>,
}

impl ViewRow {
    pub fn reduced(value: impl Into<Value>) -> Self {
        ViewRow {
            id: None,
            key: Value::Null,
            value: value.into(),
            doc: None,
        }
    }
}

/// Rows ordered by key, then by document id.
pub fn sort_rows(rows: &mut [ViewRow]) {
    rows.sort_by(|a, b| collate(&a.key, &b.key).then_with(|| a.id.cmp(&b.id)));
}

#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    views: HashMap<ViewName, View>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Every view the platform queries.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for view in standard::views() {
            registry.register(view);
        }
        registry
    }

    pub fn register(&mut self, view: View) {
        self.views.insert(view.name.clone(), view);
    }

    pub fn get(&self, name: &ViewName) -> Option<&View> {
        self.views.get(name)
    }

    fn view(&self, name: &ViewName) -> Result<&View, ViewError> {
        self.get(name)
            .ok_or_else(|| ViewError::UnknownView(name.to_string()))
    }

    /// The reduction a query asks for, if any.
    pub fn reduce_of(&self, name: &ViewName, query: &ViewQuery) -> Result<Option<Reduce>, ViewError> {
        let view = self.view(name)?;

        match (query.reduce, view.reduce) {
            (false, _) => Ok(None),
            (true, Some(reduce)) => Ok(Some(reduce)),
            (true, None) => Err(ViewError::NoReduce(name.to_string())),
        }
    }

    /// Runs a query against a set of documents.
    pub fn evaluate<'d>(
        &self,
        name: &ViewName,
        docs: impl IntoIterator<Item = &'d Value>,
        query: &ViewQuery,
    ) -> Result<Vec<ViewRow>, ViewError> {
        let view = self.view(name)?;
        let reduce = self.reduce_of(name, query)?;

        let mut rows = vec![];
        for doc in docs {
            let id = doc.get("_id").and_then(Value::as_str).map(DocId::from);

            for (key, value) in (view.map)(doc) {
                if !query.matches(&key) {
                    continue;
                }

                rows.push(ViewRow {
                    id: id.clone(),
                    key,
                    value,
                    doc: query.include_docs.then(|| doc.clone()),
                });
            }
        }

        if let Some(reduce) = reduce {
            return Ok(vec![ViewRow::reduced(reduce.apply(&rows))]);
        }

        sort_rows(&mut rows);
        if query.descending {
            rows.reverse();
        }

        Ok(query.paginate(rows))
    }
}

/// Stores evaluating their views out of a [`ViewRegistry`].
pub trait ViewSource {
    fn views(&self) -> &ViewRegistry;
}
