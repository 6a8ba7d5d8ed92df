//! Storage namespaces
//!
//! Each entity collection lives under one key: `<namespace>:<suffix>`.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    User,
    Transactions,
    Budgets,
    Settings,
}

impl StorageKey {
    pub fn all() -> &'static [StorageKey] {
        &[Self::User, Self::Transactions, Self::Budgets, Self::Settings]
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Transactions => "transactions",
            Self::Budgets => "budgets",
            Self::Settings => "settings",
        }
    }

    /// Full key under `namespace`
    pub fn key(&self, namespace: &str) -> String {
        format!("{}:{}", namespace, self.suffix())
    }
}
