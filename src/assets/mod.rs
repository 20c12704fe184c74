//! Asset loading.
//!
//! - [`AssetServer`]: asynchronous model loading on a background runtime
//! - [`LoadTask`]: polled, fire-once handle to a pending load
//! - [`GltfLoader`]: glTF/GLB parsing into a [`Prefab`]

pub mod io;
pub mod loaders;
pub mod prefab;
pub mod server;

pub use io::{AssetReader, FileAssetReader};
pub use loaders::GltfLoader;
pub use prefab::{Prefab, PrefabNode};
pub use server::{AssetServer, LoadTask};
