//! # navcovers - Pipeline de pochettes pour NavRPC
//!
//! Cette crate transforme une référence de pochette Navidrome en URL
//! affichable par Discord :
//!
//! 1. [`store`] : un cache disque `album → URL` persisté en JSON, relu au
//!    démarrage et réécrit à chaque nouvel upload.
//! 2. [`optimize`] : redimensionnement et ré-encodage JPEG des octets bruts
//!    téléchargés depuis Navidrome.
//! 3. [`imgur`] : upload de l'image optimisée vers l'API Imgur.
//! 4. [`resolver`] : la chaîne de résolution ordonnée qui enchaîne cache,
//!    upload et asset statique de repli.
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use navcovers::{CoverResolver, CoverSource, CoverStore, ImgurUploader};
//! use navconfig::ImageConfig;
//!
//! struct Dummy;
//! impl CoverSource for Dummy {
//!     fn fetch_cover(&self, _cover_id: &str) -> anyhow::Result<Vec<u8>> {
//!         Ok(std::fs::read("cover.jpg")?)
//!     }
//! }
//!
//! let store = CoverStore::load("cover_cache.json");
//! let uploader = ImgurUploader::new("client-id")?;
//! let mut resolver =
//!     CoverResolver::new(Dummy, store, uploader, ImageConfig::default(), None);
//! let url = resolver.resolve("The Album", "al-123");
//! # Ok::<(), navcovers::CoverError>(())
//! ```

pub mod error;
pub mod imgur;
pub mod optimize;
pub mod resolver;
pub mod store;

pub use error::{CoverError, Result};
pub use imgur::ImgurUploader;
pub use optimize::optimize;
pub use resolver::{CoverResolver, CoverSource};
pub use store::CoverStore;
