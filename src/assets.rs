//! Image assets
//!
//! Loading is best effort: a failed or missing image is logged and the
//! renderer falls back to plain shapes. Nothing here can abort a session.

use std::collections::HashMap;
use std::future::Future;

use crate::error::AssetError;
use crate::settings::AssetManifest;

/// Named images the engine draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKey {
    Firefly,
    Net,
}

impl ImageKey {
    pub const ALL: [ImageKey; 2] = [ImageKey::Firefly, ImageKey::Net];
}

/// A drawable image handle
pub trait Sprite {
    /// Fully decoded and safe to draw
    fn is_ready(&self) -> bool;
}

/// Starts image loads
pub trait ImageLoader {
    type Image: Sprite;
    type Pending: Future<Output = Result<Self::Image, AssetError>>;

    /// Begin loading immediately; the returned future only waits for it
    fn begin(&self, url: &str) -> Self::Pending;
}

/// Cache of loaded images
#[derive(Debug)]
pub struct AssetLibrary<I> {
    images: HashMap<ImageKey, I>,
}

impl<I> Default for AssetLibrary<I> {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
        }
    }
}

impl<I> AssetLibrary<I> {
    /// Library with nothing loaded (everything draws as fallback)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every image in the manifest
    pub async fn load<L>(loader: &L, manifest: &AssetManifest) -> Self
    where
        L: ImageLoader<Image = I>,
    {
        let mut library = Self::empty();
        library.preload(loader, manifest, &ImageKey::ALL).await;
        library
    }

    /// Load a single image and cache it under `key`
    pub async fn load_image<L>(&mut self, loader: &L, key: ImageKey, url: &str) -> Result<&I, AssetError>
    where
        L: ImageLoader<Image = I>,
    {
        let result = loader.begin(url).await;
        self.settle(key, result)?;
        self.images.get(&key).ok_or(AssetError::NotConfigured(key))
    }

    /// Load several images concurrently and wait for all of them to settle.
    /// Failures are logged and skipped; returns how many loaded.
    pub async fn preload<L>(&mut self, loader: &L, manifest: &AssetManifest, keys: &[ImageKey]) -> usize
    where
        L: ImageLoader<Image = I>,
    {
        log::info!("Preloading {} images", keys.len());

        // Kick off every load before awaiting any of them
        let mut pending = Vec::with_capacity(keys.len());
        for &key in keys {
            match manifest.image_url(key) {
                Some(url) => pending.push((key, loader.begin(url))),
                None => {
                    let _ = self.settle(key, Err(AssetError::NotConfigured(key)));
                }
            }
        }

        let mut loaded = 0;
        for (key, load) in pending {
            if self.settle(key, load.await).is_ok() {
                loaded += 1;
            }
        }

        log::info!("Preload settled: {loaded}/{} images available", keys.len());
        loaded
    }

    /// Record the outcome of one load
    fn settle(&mut self, key: ImageKey, result: Result<I, AssetError>) -> Result<(), AssetError> {
        match result {
            Ok(image) => {
                self.images.insert(key, image);
                Ok(())
            }
            Err(e) => {
                log::error!("Image {key:?} unavailable, using fallback: {e}");
                Err(e)
            }
        }
    }

    /// Cached image, or None to draw the fallback
    pub fn get(&self, key: ImageKey) -> Option<&I> {
        self.images.get(&key)
    }

    pub fn insert(&mut self, key: ImageKey, image: I) {
        self.images.insert(key, image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl<I: Sprite> AssetLibrary<I> {
    /// Cached image that is decoded and ready to draw
    pub fn ready(&self, key: ImageKey) -> Option<&I> {
        self.get(key).filter(|image| image.is_ready())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{HtmlImageLoader, PendingImage};

#[cfg(target_arch = "wasm32")]
mod web {
    use std::future::Future;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlImageElement;

    use super::{ImageLoader, Sprite};
    use crate::error::AssetError;

    impl Sprite for HtmlImageElement {
        fn is_ready(&self) -> bool {
            self.complete() && self.natural_width() > 0
        }
    }

    /// Loads images through `<img>` elements
    #[derive(Debug, Default, Clone, Copy)]
    pub struct HtmlImageLoader;

    /// An `<img>` whose onload/onerror is bridged to a promise
    pub struct PendingImage {
        image: Option<HtmlImageElement>,
        url: String,
        done: Option<JsFuture>,
    }

    impl ImageLoader for HtmlImageLoader {
        type Image = HtmlImageElement;
        type Pending = PendingImage;

        fn begin(&self, url: &str) -> PendingImage {
            let Ok(image) = HtmlImageElement::new() else {
                return PendingImage {
                    image: None,
                    url: url.to_string(),
                    done: None,
                };
            };
            image.set_cross_origin(Some("anonymous"));

            let promise = js_sys::Promise::new(&mut |resolve, reject| {
                image.set_onload(Some(&resolve));
                image.set_onerror(Some(&reject));
            });
            // Setting src starts the request
            image.set_src(url);

            PendingImage {
                image: Some(image),
                url: url.to_string(),
                done: Some(JsFuture::from(promise)),
            }
        }
    }

    impl Future for PendingImage {
        type Output = Result<HtmlImageElement, AssetError>;

        fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
            let this = self.get_mut();
            let Some(done) = this.done.as_mut() else {
                return Poll::Ready(Err(AssetError::LoadFailed {
                    url: this.url.clone(),
                }));
            };
            let result = match Pin::new(done).poll(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(result) => result,
            };

            this.done = None;
            let image = this.image.take();
            if let Some(image) = &image {
                image.set_onload(None);
                image.set_onerror(None);
            }
            match (result, image) {
                (Ok(_), Some(image)) => Poll::Ready(Ok(image)),
                _ => Poll::Ready(Err(AssetError::LoadFailed {
                    url: this.url.clone(),
                })),
            }
        }
    }
}
