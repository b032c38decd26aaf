//! Store registry: which data files back each store code.

use std::collections::BTreeMap;
use std::path::PathBuf;

use shelfcast_core::StoreId;

/// Maps store codes to the files holding their combined history.
///
/// The deployment serves a fixed set of stores; unknown codes are rejected at
/// the routing layer rather than probed on disk.
#[derive(Debug, Clone)]
pub struct StoreRegistry {
    entries: BTreeMap<StoreId, Vec<PathBuf>>,
}

impl StoreRegistry {
    pub fn new(entries: BTreeMap<StoreId, Vec<PathBuf>>) -> Self {
        Self { entries }
    }

    /// The default three-store deployment, with the data directory taken from
    /// `SHELFCAST_DATA_DIR` (falling back to the working directory).
    pub fn from_env() -> Self {
        let base = PathBuf::from(std::env::var("SHELFCAST_DATA_DIR").unwrap_or_else(|_| ".".into()));
        let entries = (1..=3)
            .map(|n| {
                (
                    StoreId::from(format!("store{n}")),
                    vec![base.join(format!("shop_{n}_combined.csv"))],
                )
            })
            .collect();
        Self::new(entries)
    }

    pub fn files_for(&self, store_id: &StoreId) -> Option<&[PathBuf]> {
        self.entries.get(store_id).map(Vec::as_slice)
    }

    pub fn store_ids(&self) -> impl Iterator<Item = &StoreId> {
        self.entries.keys()
    }
}
