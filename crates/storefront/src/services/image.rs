//! Product image resolution.

use serde::Serialize;
use url::Url;

use minicart_core::Product;

use crate::sections::SectionError;

/// Where an image is going to be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageContext {
    MiniCartThumbnail,
}

impl ImageContext {
    /// Identifier of the presentation context.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::MiniCartThumbnail => "mini_cart_product_thumbnail",
        }
    }

    /// Rendered `(width, height)` in pixels.
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::MiniCartThumbnail => (75, 75),
        }
    }

    const fn placeholder(self) -> &'static str {
        match self {
            Self::MiniCartThumbnail => "catalog/product/placeholder/thumbnail.jpg",
        }
    }
}

/// Display-ready image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDescriptor {
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

/// Resolves a product's image for a presentation context.
pub trait ImageResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns `SectionError` if the image URL cannot be built.
    fn resolve(
        &self,
        product: &Product,
        context: ImageContext,
    ) -> Result<ImageDescriptor, SectionError>;
}

/// Serves product images from the media base URL.
#[derive(Debug, Clone)]
pub struct MediaImageResolver {
    media_url: Url,
}

impl MediaImageResolver {
    /// `media_url` must end with `/` so relative paths join beneath it.
    #[must_use]
    pub const fn new(media_url: Url) -> Self {
        Self { media_url }
    }
}

impl ImageResolver for MediaImageResolver {
    fn resolve(
        &self,
        product: &Product,
        context: ImageContext,
    ) -> Result<ImageDescriptor, SectionError> {
        let (width, height) = context.dimensions();

        let (src, alt) = match &product.image {
            Some(image) => {
                let path = format!("catalog/product/{}", image.path.trim_start_matches('/'));
                let alt = image
                    .label
                    .clone()
                    .filter(|label| !label.is_empty())
                    .unwrap_or_else(|| product.name.clone());
                (self.media_url.join(&path)?, alt)
            }
            None => (
                self.media_url.join(context.placeholder())?,
                product.name.clone(),
            ),
        };

        Ok(ImageDescriptor {
            src: src.into(),
            alt,
            width,
            height,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use minicart_core::{ProductImage, ProductType, Visibility};
    use rust_decimal::Decimal;

    use super::*;

    fn product(image: Option<ProductImage>) -> Product {
        Product {
            id: 1.into(),
            sku: "MB01".to_string(),
            name: "Joust Duffle Bag".to_string(),
            url_key: None,
            visibility: Visibility::Both,
            type_id: ProductType::Simple,
            price: Decimal::ONE,
            image,
            msrp: None,
            msrp_display: minicart_core::MsrpDisplay::UseConfig,
            minimal_price: None,
        }
    }

    fn resolver() -> MediaImageResolver {
        MediaImageResolver::new(Url::parse("https://cdn.example.com/media/").unwrap())
    }

    #[test]
    fn test_resolve_product_image() {
        let image = ProductImage {
            path: "/m/b/mb01-blue-0.jpg".to_string(),
            label: Some("Blue duffle".to_string()),
        };
        let descriptor = resolver()
            .resolve(&product(Some(image)), ImageContext::MiniCartThumbnail)
            .unwrap();

        assert_eq!(
            descriptor.src,
            "https://cdn.example.com/media/catalog/product/m/b/mb01-blue-0.jpg"
        );
        assert_eq!(descriptor.alt, "Blue duffle");
        assert_eq!((descriptor.width, descriptor.height), (75, 75));
    }

    #[test]
    fn test_empty_label_falls_back_to_name() {
        let image = ProductImage {
            path: "m/b/mb01.jpg".to_string(),
            label: Some(String::new()),
        };
        let descriptor = resolver()
            .resolve(&product(Some(image)), ImageContext::MiniCartThumbnail)
            .unwrap();
        assert_eq!(descriptor.alt, "Joust Duffle Bag");
    }

    #[test]
    fn test_placeholder_when_no_image() {
        let descriptor = resolver()
            .resolve(&product(None), ImageContext::MiniCartThumbnail)
            .unwrap();
        assert_eq!(
            descriptor.src,
            "https://cdn.example.com/media/catalog/product/placeholder/thumbnail.jpg"
        );
        assert_eq!(descriptor.alt, "Joust Duffle Bag");
    }
}
