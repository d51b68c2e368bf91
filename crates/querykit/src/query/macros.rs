/// Builder methods every statement shares. Expects a `core: QueryCore` field.
macro_rules! impl_statement_common {
    () => {
        /// Bind a user variable referenced as `:name` in raw fragments.
        /// The leading `:` is optional.
        pub fn bind(mut self, name: &str, value: impl Into<$crate::value::Value>) -> Self {
            self.core.bindings_mut().bind(name, value);
            self
        }

        /// Bind several user variables.
        pub fn bind_all<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
        where
            K: AsRef<str>,
            V: Into<$crate::value::Value>,
        {
            for (name, value) in pairs {
                self.core.bindings_mut().bind(name.as_ref(), value);
            }
            self
        }

        /// Set the table prefix. An empty prefix clears it.
        pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
            self.core.set_prefix(Some(prefix.into()));
            self
        }
    };
}

/// WHERE builder methods. Expects `core: QueryCore` and `where_: Conditions`.
macro_rules! impl_where_methods {
    () => {
        /// Add WHERE terms.
        pub fn where_<T: Into<$crate::condition::Term>>(mut self, terms: impl IntoIterator<Item = T>) -> Self {
            for term in terms {
                self.where_.apply(self.core.bindings_mut(), term.into());
            }
            self
        }

        /// WHERE `id`=:where_id
        pub fn where_id(self, id: impl Into<$crate::value::Value>) -> Self {
            self.where_([$crate::condition::Term::id(id)])
        }

        /// WHERE `is_active`=:where_is_active, bound to 1.
        pub fn where_active(self) -> Self {
            self.where_([$crate::condition::Term::active()])
        }

        /// Add a verbatim WHERE fragment.
        pub fn where_raw(self, fragment: impl Into<String>) -> Self {
            self.where_([$crate::condition::Term::raw(fragment)])
        }

        /// WHERE `column`=:where_column
        pub fn where_eq(self, column: &str, value: impl Into<$crate::value::Value>) -> Self {
            self.where_([$crate::condition::Term::eq(column, value)])
        }

        /// WHERE column IN (...), one placeholder per value.
        pub fn where_in<V: Into<$crate::value::Value>>(
            mut self,
            column: &str,
            values: impl IntoIterator<Item = V>,
        ) -> Self {
            self.where_.where_in(self.core.bindings_mut(), column, values);
            self
        }

        /// WHERE column BETWEEN :from AND :to
        pub fn where_between(
            mut self,
            column: &str,
            from: impl Into<$crate::value::Value>,
            to: impl Into<$crate::value::Value>,
        ) -> Self {
            self.where_.where_between(self.core.bindings_mut(), column, from, to);
            self
        }

        /// Join WHERE terms with AND (`true`, default) or OR (`false`).
        pub fn join_where_by_and(mut self, and: bool) -> Self {
            self.where_.set_glue($crate::condition::Glue::from_and(and));
            self
        }
    };
}

/// LIMIT setter, plus OFFSET with `offset`. Expects `limit: Option<u64>`,
/// and `offset: u64` for the second form.
macro_rules! impl_limit_methods {
    () => {
        /// Row count limit. Zero removes the limit.
        pub fn limit(mut self, limit: u64) -> Self {
            self.limit = Some(limit);
            self
        }
    };
    (offset) => {
        impl_limit_methods!();

        /// Rows to skip; only rendered together with a limit.
        pub fn offset(mut self, offset: u64) -> Self {
            self.offset = offset;
            self
        }
    };
}
