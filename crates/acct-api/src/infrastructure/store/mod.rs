//! Store adapters implementing [`ConfigRepository`].

use std::sync::Arc;

use tracing::info;

use crate::application::ConfigRepository;
use crate::domain::StoreSettings;

pub mod file;
pub mod memory;
pub mod supabase;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use supabase::SupabaseStore;

/// Builds the repository selected by `settings`.
pub fn open_store(settings: &StoreSettings) -> Arc<dyn ConfigRepository> {
    match settings {
        StoreSettings::Memory => {
            info!("using in-memory store (data is lost on exit)");
            Arc::new(MemoryStore::new())
        }
        StoreSettings::File { path } => {
            info!("using file store at {}", path.display());
            Arc::new(FileStore::new(path.clone()))
        }
        StoreSettings::Supabase { url, api_key } => {
            info!("using hosted store at {url}");
            Arc::new(SupabaseStore::new(url.clone(), api_key.clone()))
        }
    }
}
