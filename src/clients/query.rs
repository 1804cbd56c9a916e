//! Typed query builder for the Directus items API.
//!
//! A [`Query`] names a collection, its filter conditions, the fields to
//! select, which translation relations to restrict to a single language, and
//! sort/paging. [`Query::to_query_pairs`] compiles it into the bracketed query
//! string syntax Directus expects, e.g.
//! `filter[translations][slug_permalink][_eq]=roma`.

/// Comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    /// Case-insensitive substring match
    IContains,
}

impl FilterOp {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "_eq",
            Self::Neq => "_neq",
            Self::IContains => "_icontains",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Compare {
        /// Dotted field path, e.g. `translations.slug_permalink`
        path: String,
        op: FilterOp,
        value: String,
    },
    AnyOf(Vec<Condition>),
    /// Every condition must hold on the same row of a related collection,
    /// e.g. one translation row.
    Within {
        relation: String,
        conditions: Vec<Condition>,
    },
}

impl Condition {
    pub fn eq(path: &str, value: impl ToString) -> Self {
        Self::compare(path, FilterOp::Eq, value)
    }

    pub fn neq(path: &str, value: impl ToString) -> Self {
        Self::compare(path, FilterOp::Neq, value)
    }

    pub fn icontains(path: &str, value: impl ToString) -> Self {
        Self::compare(path, FilterOp::IContains, value)
    }

    #[must_use]
    pub const fn any_of(conditions: Vec<Self>) -> Self {
        Self::AnyOf(conditions)
    }

    #[must_use]
    pub fn within(relation: &str, conditions: Vec<Self>) -> Self {
        Self::Within {
            relation: relation.to_string(),
            conditions,
        }
    }

    /// Applies `condition` to the `lang` row of a translation relation, so a
    /// match in another language does not count.
    #[must_use]
    pub fn translated(relation: &str, lang: &str, condition: Self) -> Self {
        Self::within(relation, vec![Self::eq("languages_code", lang), condition])
    }

    fn compare(path: &str, op: FilterOp, value: impl ToString) -> Self {
        Self::Compare {
            path: path.to_string(),
            op,
            value: value.to_string(),
        }
    }

    fn compile(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        match self {
            Self::Compare { path, op, value } => {
                let key = format!("{prefix}{}[{}]", bracketed(path), op.as_str());
                out.push((key, value.clone()));
            }
            Self::AnyOf(conditions) => {
                for (index, condition) in conditions.iter().enumerate() {
                    condition.compile(&format!("{prefix}[_or][{index}]"), out);
                }
            }
            Self::Within {
                relation,
                conditions,
            } => {
                let scoped = format!("{prefix}{}", bracketed(relation));
                for (index, condition) in conditions.iter().enumerate() {
                    condition.compile(&format!("{scoped}[_and][{index}]"), out);
                }
            }
        }
    }
}

/// `region_id.translations` -> `[region_id][translations]`
fn bracketed(path: &str) -> String {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .map(|segment| format!("[{segment}]"))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    collection: String,
    conditions: Vec<Condition>,
    fields: Vec<String>,
    locales: Vec<(String, String)>,
    sort: Vec<String>,
    offset: Option<u32>,
    limit: Option<i64>,
    total_count: bool,
}

impl Query {
    /// Starts a query against `/items/{collection}`.
    #[must_use]
    pub fn items(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            conditions: Vec::new(),
            fields: Vec::new(),
            locales: Vec::new(),
            sort: Vec::new(),
            offset: None,
            limit: None,
            total_count: false,
        }
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Path relative to the CMS base URL.
    #[must_use]
    pub fn path(&self) -> String {
        format!("items/{}", self.collection)
    }

    #[must_use]
    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    #[must_use]
    pub fn fields(mut self, fields: &[&str]) -> Self {
        self.fields.extend(fields.iter().map(ToString::to_string));
        self
    }

    /// Restricts the embedded translations of `relation` to `lang`.
    #[must_use]
    pub fn localized(mut self, relation: &str, lang: &str) -> Self {
        self.locales.push((relation.to_string(), lang.to_string()));
        self
    }

    #[must_use]
    pub fn sort_desc(mut self, field: &str) -> Self {
        self.sort.push(format!("-{field}"));
        self
    }

    #[must_use]
    pub fn sort_asc(mut self, field: &str) -> Self {
        self.sort.push(field.to_string());
        self
    }

    #[must_use]
    pub const fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Page size; `-1` asks for every record.
    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn with_total_count(mut self) -> Self {
        self.total_count = true;
        self
    }

    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        // Several `_or` groups at the top level would share the same keys, so
        // they are spread over an explicit `_and`.
        let needs_and = self.conditions.len() > 1
            && self
                .conditions
                .iter()
                .any(|c| matches!(c, Condition::AnyOf(_)));

        for (index, condition) in self.conditions.iter().enumerate() {
            if needs_and {
                condition.compile(&format!("filter[_and][{index}]"), &mut pairs);
            } else {
                condition.compile("filter", &mut pairs);
            }
        }

        for field in &self.fields {
            pairs.push(("fields[]".to_string(), field.clone()));
        }

        for (relation, lang) in &self.locales {
            pairs.push((
                format!("deep{}[_filter][languages_code][_eq]", bracketed(relation)),
                lang.clone(),
            ));
        }

        if !self.sort.is_empty() {
            pairs.push(("sort".to_string(), self.sort.join(",")));
        }

        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        if self.total_count {
            pairs.push(("meta".to_string(), "total_count".to_string()));
        }

        pairs
    }
}
