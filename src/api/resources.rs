//! Typed wrappers over the catalog CRUD endpoints. Each wrapper only knows
//! its path and DTOs; auth, retry and error mapping come from `ApiClient`.

use crate::{
    api::{
        client::ApiClient,
        transport::{FormPart, Transport},
        types::{
            Category, CategoryInput, Color, ColorInput, DeleteResult, Item, ItemInput, Lending,
            LendingInput, ReorderImages, SocialLink, SocialLinkInput, SocialLinkPatch, Style,
            StyleInput,
        },
    },
    errors::ClientError,
};
use http::Method;

pub const CATEGORY_PATH: &str = "/kategory";
pub const ITEM_PATH: &str = "/item";
pub const STYLE_PATH: &str = "/style";
pub const LENDING_PATH: &str = "/lending";
pub const SOCIAL_PATH: &str = "/social";
pub const COLOR_PATH: &str = "/color";

/// Multipart field used by single-image uploads.
pub const IMAGE_FIELD: &str = "image";
/// Multipart field repeated once per file by multi-image uploads.
pub const IMAGES_FIELD: &str = "images";

fn member(base: &str, id: i64) -> String {
    format!("{base}/{id}")
}

/// Renames every part to `field`, keeping file names and bytes.
fn as_field(field: &str, parts: Vec<FormPart>) -> Vec<FormPart> {
    parts
        .into_iter()
        .map(|part| FormPart {
            name: field.to_string(),
            ..part
        })
        .collect()
}

pub struct Categories<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Categories<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn list(&self) -> Result<Vec<Category>, ClientError> {
        self.client.get_json(CATEGORY_PATH).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn get(&self, id: i64) -> Result<Category, ClientError> {
        self.client.get_json(&member(CATEGORY_PATH, id)).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn create(&self, input: &CategoryInput) -> Result<Category, ClientError> {
        self.client
            .send_json(Method::POST, CATEGORY_PATH, input)
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn update(&self, id: i64, input: &CategoryInput) -> Result<Category, ClientError> {
        self.client
            .send_json(Method::PUT, &member(CATEGORY_PATH, id), input)
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn upload_image(&self, id: i64, image: FormPart) -> Result<Category, ClientError> {
        self.client
            .send_multipart(
                Method::PATCH,
                &member(CATEGORY_PATH, id),
                as_field(IMAGE_FIELD, vec![image]),
            )
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn delete(&self, id: i64) -> Result<DeleteResult, ClientError> {
        self.client.delete(&member(CATEGORY_PATH, id)).await
    }
}

pub struct Items<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Items<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn list(&self) -> Result<Vec<Item>, ClientError> {
        self.client.get_json(ITEM_PATH).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn get(&self, id: i64) -> Result<Item, ClientError> {
        self.client.get_json(&member(ITEM_PATH, id)).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn create(&self, input: &ItemInput) -> Result<Item, ClientError> {
        self.client.send_json(Method::POST, ITEM_PATH, input).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn update(&self, id: i64, input: &ItemInput) -> Result<Item, ClientError> {
        self.client
            .send_json(Method::PUT, &member(ITEM_PATH, id), input)
            .await
    }

    /// Replaces the primary image.
    ///
    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn upload_image(&self, id: i64, image: FormPart) -> Result<Item, ClientError> {
        self.client
            .send_multipart(
                Method::PATCH,
                &member(ITEM_PATH, id),
                as_field(IMAGE_FIELD, vec![image]),
            )
            .await
    }

    /// Appends gallery images.
    ///
    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn upload_images(&self, id: i64, images: Vec<FormPart>) -> Result<Item, ClientError> {
        self.client
            .send_multipart(
                Method::POST,
                &format!("{ITEM_PATH}/{id}/images"),
                as_field(IMAGES_FIELD, images),
            )
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn delete_image(&self, id: i64, image_id: i64) -> Result<Item, ClientError> {
        self.client
            .delete(&format!("{ITEM_PATH}/{id}/images/{image_id}"))
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn reorder_images(&self, id: i64, image_ids: Vec<i64>) -> Result<Item, ClientError> {
        self.client
            .send_json(
                Method::PUT,
                &format!("{ITEM_PATH}/{id}/images/reorder"),
                &ReorderImages { image_ids },
            )
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn delete(&self, id: i64) -> Result<DeleteResult, ClientError> {
        self.client.delete(&member(ITEM_PATH, id)).await
    }
}

pub struct Styles<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> Styles<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn list(&self) -> Result<Vec<Style>, ClientError> {
        self.client.get_json(STYLE_PATH).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn get(&self, id: i64) -> Result<Style, ClientError> {
        self.client.get_json(&member(STYLE_PATH, id)).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn create(&self, input: &StyleInput) -> Result<Style, ClientError> {
        self.client.send_json(Method::POST, STYLE_PATH, input).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn update(&self, id: i64, input: &StyleInput) -> Result<Style, ClientError> {
        self.client
            .send_json(Method::PUT, &member(STYLE_PATH, id), input)
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn upload_image(&self, id: i64, image: FormPart) -> Result<Style, ClientError> {
        self.client
            .send_multipart(
                Method::PATCH,
                &member(STYLE_PATH, id),
                as_field(IMAGE_FIELD, vec![image]),
            )
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn delete(&self, id: i64) -> Result<DeleteResult, ClientError> {
        self.client.delete(&member(STYLE_PATH, id)).await
    }
}

pub struct LendingContent<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> LendingContent<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn list(&self) -> Result<Vec<Lending>, ClientError> {
        self.client.get_json(LENDING_PATH).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn get(&self, id: i64) -> Result<Lending, ClientError> {
        self.client.get_json(&member(LENDING_PATH, id)).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn create(&self, input: &LendingInput) -> Result<Lending, ClientError> {
        self.client
            .send_json(Method::POST, LENDING_PATH, input)
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn update(&self, id: i64, input: &LendingInput) -> Result<Lending, ClientError> {
        self.client
            .send_json(Method::PATCH, &member(LENDING_PATH, id), input)
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn delete(&self, id: i64) -> Result<DeleteResult, ClientError> {
        self.client.delete(&member(LENDING_PATH, id)).await
    }
}

pub struct SocialLinks<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> SocialLinks<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn list(&self) -> Result<Vec<SocialLink>, ClientError> {
        self.client.get_json(SOCIAL_PATH).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn get(&self, id: i64) -> Result<SocialLink, ClientError> {
        self.client.get_json(&member(SOCIAL_PATH, id)).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn create(&self, input: &SocialLinkInput) -> Result<SocialLink, ClientError> {
        self.client.send_json(Method::POST, SOCIAL_PATH, input).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn update(&self, id: i64, patch: &SocialLinkPatch) -> Result<SocialLink, ClientError> {
        self.client
            .send_json(Method::PATCH, &member(SOCIAL_PATH, id), patch)
            .await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn delete(&self, id: i64) -> Result<DeleteResult, ClientError> {
        self.client.delete(&member(SOCIAL_PATH, id)).await
    }
}

pub struct ColorTheme<'a, T> {
    client: &'a ApiClient<T>,
}

impl<'a, T: Transport> ColorTheme<'a, T> {
    pub(crate) fn new(client: &'a ApiClient<T>) -> Self {
        Self { client }
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn get(&self) -> Result<Color, ClientError> {
        self.client.get_json(COLOR_PATH).await
    }

    /// # Errors
    /// Propagates pipeline and decode errors.
    pub async fn update(&self, id: i64, input: &ColorInput) -> Result<Color, ClientError> {
        self.client
            .send_json(Method::PUT, &member(COLOR_PATH, id), input)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::{IMAGES_FIELD, as_field, member};
    use crate::api::transport::FormPart;

    #[test]
    fn member_paths() {
        assert_eq!(member("/kategory", 4), "/kategory/4");
    }

    #[test]
    fn as_field_renames_every_part() {
        let parts = vec![
            FormPart::file("a", "one.png", vec![1]),
            FormPart::file("b", "two.jpg", vec![2]),
        ];
        let renamed = as_field(IMAGES_FIELD, parts);
        assert!(renamed.iter().all(|part| part.name == IMAGES_FIELD));
        assert_eq!(renamed[1].file_name, "two.jpg");
    }
}
