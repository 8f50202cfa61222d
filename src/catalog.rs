//! Catalog constants shared by the CLI and resource clients: media URL
//! resolution and the product types with their available sizes.

use crate::config::build_url_with_base;

/// Placeholder served when an entity has no image.
pub const DEFAULT_IMAGE_PATH: &str = "/media/default_item_image.png";

/// Resolves an image reference from the API into a URL ready for display.
///
/// Absolute `http(s)` URLs pass through, relative upload paths are joined to
/// the media base URL, and missing or empty values yield the placeholder.
#[must_use]
pub fn resolve_image_url(media_base_url: &str, image_url: Option<&str>) -> String {
    let Some(image_url) = image_url.map(str::trim).filter(|url| !url.is_empty()) else {
        return DEFAULT_IMAGE_PATH.to_string();
    };

    if image_url.starts_with("http://") || image_url.starts_with("https://") {
        return image_url.to_string();
    }

    build_url_with_base(media_base_url, image_url)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductType {
    pub id: &'static str,
    pub label: &'static str,
    pub label_az: &'static str,
    pub sizes: &'static [&'static str],
}

pub const PRODUCT_TYPES: &[ProductType] = &[
    ProductType {
        id: "clothing",
        label: "Одежда (верх)",
        label_az: "Geyim (üst)",
        sizes: &["XS", "S", "M", "L", "XL", "XXL", "XXXL"],
    },
    ProductType {
        id: "pants",
        label: "Брюки/Джинсы",
        label_az: "Şalvar/Cins",
        sizes: &[
            "26", "27", "28", "29", "30", "31", "32", "33", "34", "36", "38", "40",
        ],
    },
    ProductType {
        id: "shoes",
        label: "Обувь",
        label_az: "Ayaqqabı",
        sizes: &[
            "35", "36", "37", "38", "39", "40", "41", "42", "43", "44", "45", "46",
        ],
    },
    ProductType {
        id: "accessories",
        label: "Аксессуары",
        label_az: "Aksesuarlar",
        sizes: &["One Size"],
    },
    ProductType {
        id: "rings",
        label: "Кольца",
        label_az: "Üzüklər",
        sizes: &["15", "16", "17", "18", "19", "20", "21", "22"],
    },
    ProductType {
        id: "other",
        label: "Другое",
        label_az: "Digər",
        sizes: &[],
    },
];

#[must_use]
pub fn product_type(id: &str) -> Option<&'static ProductType> {
    PRODUCT_TYPES.iter().find(|t| t.id == id)
}

/// Sizes offered for a product type; empty for unknown types.
#[must_use]
pub fn sizes_for_type(id: &str) -> &'static [&'static str] {
    product_type(id).map_or(&[], |t| t.sizes)
}
