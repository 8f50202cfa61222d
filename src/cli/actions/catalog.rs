use crate::{
    api::types::{Category, Item, Style},
    catalog::{PRODUCT_TYPES, product_type, resolve_image_url},
    cli::actions::{Context, print_json},
    config::AppConfig,
};
use anyhow::{Result, anyhow};
use serde_json::json;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Categories,
    Items,
    Styles,
    Lending,
    Social,
}

impl FromStr for Resource {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "categories" => Ok(Self::Categories),
            "items" => Ok(Self::Items),
            "styles" => Ok(Self::Styles),
            "lending" => Ok(Self::Lending),
            "social" => Ok(Self::Social),
            other => Err(anyhow!("unknown resource: {other}")),
        }
    }
}

/// Lists a resource with every image reference resolved for display.
/// # Errors
/// Returns an error if the request fails or the session can not be recovered.
pub async fn list(context: &Context, resource: Resource) -> Result<()> {
    context.resume().await;
    let api = &context.api;
    let resolve = |url: Option<String>| Some(api.image_url(url.as_deref()));

    match resource {
        Resource::Categories => {
            let categories: Vec<Category> = api
                .categories()
                .list()
                .await?
                .into_iter()
                .map(|mut category| {
                    category.image_url = resolve(category.image_url.take());
                    category
                })
                .collect();
            print_json(&categories)
        }
        Resource::Items => {
            let items: Vec<Item> = api
                .items()
                .list()
                .await?
                .into_iter()
                .map(|mut item| {
                    item.image_url = resolve(item.image_url.take());
                    for image in item.images.iter_mut().flatten() {
                        image.url = resolve(image.url.take());
                    }
                    item
                })
                .collect();
            print_json(&items)
        }
        Resource::Styles => {
            let styles: Vec<Style> = api
                .styles()
                .list()
                .await?
                .into_iter()
                .map(|mut style| {
                    style.image_url = resolve(style.image_url.take());
                    style
                })
                .collect();
            print_json(&styles)
        }
        Resource::Lending => print_json(&api.lending().list().await?),
        Resource::Social => print_json(&api.social().list().await?),
    }
}

/// # Errors
/// Returns an error if the request fails or the session can not be recovered.
pub async fn color(context: &Context) -> Result<()> {
    context.resume().await;
    print_json(&context.api.color().get().await?)
}

/// # Errors
/// Returns an error if the output can not be written.
pub fn image_url(config: &AppConfig, url: Option<&str>) -> Result<()> {
    println!("{}", resolve_image_url(&config.media_base_url, url));
    Ok(())
}

/// # Errors
/// Returns an error naming the known types when `id` is not one of them.
pub fn sizes(id: &str) -> Result<()> {
    let Some(kind) = product_type(id) else {
        let known: Vec<&str> = PRODUCT_TYPES.iter().map(|t| t.id).collect();
        return Err(anyhow!(
            "unknown product type {id:?}, expected one of: {}",
            known.join(", ")
        ));
    };

    print_json(&json!({
        "type": kind.id,
        "label": kind.label,
        "labelAz": kind.label_az,
        "sizes": kind.sizes,
    }))
}

#[cfg(test)]
mod tests {
    use super::Resource;

    #[test]
    fn resource_names_match_command_values() {
        for name in crate::cli::commands::RESOURCES {
            assert!(name.parse::<Resource>().is_ok(), "{name}");
        }
        assert!("users".parse::<Resource>().is_err());
    }
}
