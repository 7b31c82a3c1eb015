//! Item thumbnails: directory listing lookups and the best-frame picker.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use common::{
    search_const::{THUMBNAILS_LEADING_SKIP, THUMBNAILS_PER_ITEM},
    search_result::{SearchResultDocumentItem, ThumbnailSet},
};
use futures::future::join_all;
use regex::Regex;
use tracing::warn;

use crate::db_utils::item_locator::ItemLocator;

static THUMB_DIR_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^<a href="(.+\.thumbs/)">"#).expect("valid thumb dir regex"));
static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^<a href="(.+)">"#).expect("valid link regex"));
static THUMB_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^<a href="(.+thumb.*)">"#).expect("valid thumb link regex"));

/// Picks `num` representative entries. Short lists are returned whole,
/// slightly longer ones drop the first entry, otherwise the first
/// `start_skip` entries are skipped and the rest sampled evenly.
pub fn pick_best<T: Clone>(items: &[T], num: usize, start_skip: usize) -> Vec<T> {
    let len = items.len();
    if num == 0 {
        return Vec::new();
    }
    if len <= num {
        return items.to_vec();
    }
    if len <= num + 3 {
        return items[1..1 + num].to_vec();
    }
    let step = (len.saturating_sub(start_skip) / num).max(1);
    items
        .iter()
        .enumerate()
        .skip(start_skip)
        .filter(|(i, _)| i % step == 0)
        .map(|(_, item)| item.clone())
        .take(num)
        .collect()
}

/// First `*.thumbs/` directory linked from an item listing.
pub fn find_thumb_dir(listing: &str) -> Option<String> {
    listing
        .lines()
        .find_map(|line| THUMB_DIR_LINK.captures(line).map(|c| c[1].to_string()))
}

/// First link whose target mentions `thumb`.
pub fn find_thumb_link(listing: &str) -> Option<String> {
    listing
        .lines()
        .find_map(|line| THUMB_LINK.captures(line).map(|c| c[1].to_string()))
}

/// Every link target in a directory listing, in listing order.
pub fn listing_links(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter_map(|line| LINK.captures(line).map(|c| c[1].to_string()))
        .collect()
}

#[async_trait]
pub trait ThumbnailSource: Send + Sync {
    async fn movie_thumbnails(&self, identifier: &str) -> anyhow::Result<Option<ThumbnailSet>>;

    /// URL of the item's single preview image.
    async fn image_thumbnail(&self, identifier: &str) -> anyhow::Result<Option<String>>;
}

pub struct ItemThumbnailSource {
    locator: Arc<dyn ItemLocator>,
    http: reqwest::Client,
}

impl ItemThumbnailSource {
    pub fn new(locator: Arc<dyn ItemLocator>, http: reqwest::Client) -> Self {
        Self { locator, http }
    }

    async fn fetch_listing(&self, url: &str) -> anyhow::Result<String> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl ThumbnailSource for ItemThumbnailSource {
    async fn movie_thumbnails(&self, identifier: &str) -> anyhow::Result<Option<ThumbnailSet>> {
        let Some(location) = self.locator.locate(identifier).await? else {
            return Ok(None);
        };
        let item_url = location.url();
        let Some(thumb_dir) = find_thumb_dir(&self.fetch_listing(&item_url).await?) else {
            return Ok(None);
        };
        let base_url = format!("{}/{}", item_url, thumb_dir);
        let images = listing_links(&self.fetch_listing(&base_url).await?);
        Ok(Some(thumbnail_set(base_url, images)))
    }

    async fn image_thumbnail(&self, identifier: &str) -> anyhow::Result<Option<String>> {
        let Some(location) = self.locator.locate(identifier).await? else {
            return Ok(None);
        };
        let item_url = location.url();
        let link = find_thumb_link(&self.fetch_listing(&item_url).await?);
        Ok(link.map(|link| format!("{}/{}", item_url, link)))
    }
}

pub fn thumbnail_set(base_url: String, images: Vec<String>) -> ThumbnailSet {
    let picked = pick_best(&images, THUMBNAILS_PER_ITEM, THUMBNAILS_LEADING_SKIP);
    ThumbnailSet { base_url, images, picked }
}

/// Attaches thumbnails to every movie document, all lookups in parallel.
/// Failed lookups leave the document without thumbnails.
pub async fn add_thumbs_to_docs<S: ThumbnailSource + ?Sized>(docs: &mut [SearchResultDocumentItem], source: &S) {
    let lookups = docs
        .iter()
        .enumerate()
        .filter(|(_, doc)| is_movie(doc))
        .map(|(index, doc)| async move { (index, source.movie_thumbnails(&doc.identifier).await) })
        .collect::<Vec<_>>();

    let found_all = join_all(lookups).await;

    for (index, found) in found_all {
        match found {
            Ok(found) => docs[index].thumbnails = found,
            Err(e) => warn!("thumbnails for {}: {:#}", docs[index].identifier, e),
        }
    }
}

/// Attaches the preview image to every non-movie document, all lookups in
/// parallel. Failed lookups leave the document without an image.
pub async fn add_image_thumbs_to_docs<S: ThumbnailSource + ?Sized>(docs: &mut [SearchResultDocumentItem], source: &S) {
    let lookups = docs
        .iter()
        .enumerate()
        .filter(|(_, doc)| !is_movie(doc))
        .map(|(index, doc)| async move { (index, source.image_thumbnail(&doc.identifier).await) })
        .collect::<Vec<_>>();

    let found_all = join_all(lookups).await;

    for (index, found) in found_all {
        match found {
            Ok(found) => docs[index].image_thumbnail = found,
            Err(e) => warn!("image thumbnail for {}: {:#}", docs[index].identifier, e),
        }
    }
}

fn is_movie(doc: &SearchResultDocumentItem) -> bool {
    doc.mediatype.as_deref() == Some("movies")
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn pick(len: usize) -> Vec<usize> {
        pick_best(&(0..len).collect::<Vec<_>>(), 4, 3)
    }

    #[test]
    fn picker_samples_long_lists_evenly() {
        assert_eq!(pick(20), vec![4, 8, 12, 16]);
    }

    #[test]
    fn picker_short_lists() {
        assert_eq!(pick(0), Vec::<usize>::new());
        assert_eq!(pick(3), vec![0, 1, 2]);
        assert_eq!(pick(4), vec![0, 1, 2, 3]);
        assert_eq!(pick(5), vec![1, 2, 3, 4]);
        assert_eq!(pick(6), vec![1, 2, 3, 4]);
        assert_eq!(pick(7), vec![1, 2, 3, 4]);
        assert_eq!(pick(8), vec![3, 4, 5, 6]);
        assert_eq!(pick(9), vec![3, 4, 5, 6]);
    }

    #[test]
    fn listing_links_are_extracted() {
        let listing = "<html>\n<a href=\"apollo11.mp4\">apollo11.mp4</a>\n<a href=\"apollo11.thumbs/\">apollo11.thumbs/</a>\n";
        assert_eq!(find_thumb_dir(listing).as_deref(), Some("apollo11.thumbs/"));
        assert_eq!(listing_links(listing), vec!["apollo11.mp4", "apollo11.thumbs/"]);
        assert_eq!(find_thumb_dir("<a href=\"x.mp4\">x</a>"), None);
    }

    #[test]
    fn picker_degenerate_arguments() {
        assert!(pick_best(&[1, 2, 3], 0, 3).is_empty());
        assert_eq!(pick_best(&(0..10).collect::<Vec<_>>(), 2, 50), Vec::<usize>::new());
    }

    #[test]
    fn thumb_link_is_the_first_thumb_named_entry() {
        let listing = "<a href=\"apollo11_meta.xml\">meta</a>\n<a href=\"__ia_thumb.jpg\">__ia_thumb.jpg</a>\n<a href=\"cover_thumb.png\">x</a>\n";
        assert_eq!(find_thumb_link(listing).as_deref(), Some("__ia_thumb.jpg"));
        assert_eq!(find_thumb_link("<a href=\"book.pdf\">book.pdf</a>"), None);
        assert_eq!(find_thumb_link("  <a href=\"__ia_thumb.jpg\">"), None);
    }

    /// Items with an empty frame list fail the lookup.
    struct CannedSource(HashMap<String, Vec<String>>);

    #[async_trait]
    impl ThumbnailSource for CannedSource {
        async fn movie_thumbnails(&self, identifier: &str) -> anyhow::Result<Option<ThumbnailSet>> {
            match self.0.get(identifier) {
                Some(images) if images.is_empty() => anyhow::bail!("listing failed"),
                Some(images) => Ok(Some(thumbnail_set(format!("http://h/{identifier}.thumbs/"), images.clone()))),
                None => Ok(None),
            }
        }

        async fn image_thumbnail(&self, identifier: &str) -> anyhow::Result<Option<String>> {
            match self.0.get(identifier) {
                Some(images) if images.is_empty() => anyhow::bail!("listing failed"),
                Some(images) => Ok(images.first().map(|img| format!("http://h/{identifier}/{img}"))),
                None => Ok(None),
            }
        }
    }

    fn doc(id: &str, mediatype: &str) -> SearchResultDocumentItem {
        SearchResultDocumentItem { identifier: id.into(), mediatype: Some(mediatype.into()), ..Default::default() }
    }

    fn frames(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{i:06}.jpg")).collect()
    }

    #[tokio::test]
    async fn only_movies_get_thumbnails() {
        let source = CannedSource(HashMap::from([
            ("a".to_string(), frames(20)),
            ("b".to_string(), frames(2)),
            ("c".to_string(), Vec::new()),
        ]));
        let mut docs = vec![doc("a", "movies"), doc("b", "texts"), doc("c", "movies"), doc("d", "movies")];

        add_thumbs_to_docs(&mut docs, &source).await;

        let a = docs[0].thumbnails.as_ref().unwrap();
        assert_eq!(a.images.len(), 20);
        assert_eq!(a.picked, vec!["000004.jpg", "000008.jpg", "000012.jpg", "000016.jpg"]);
        assert!(docs[1].thumbnails.is_none());
        assert!(docs[2].thumbnails.is_none());
        assert!(docs[3].thumbnails.is_none());
        assert!(docs.iter().all(|d| d.image_thumbnail.is_none()));
    }

    #[tokio::test]
    async fn non_movies_get_a_preview_image() {
        let source = CannedSource(HashMap::from([
            ("a".to_string(), frames(3)),
            ("b".to_string(), vec!["__ia_thumb.jpg".to_string()]),
            ("c".to_string(), Vec::new()),
        ]));
        let mut docs = vec![doc("a", "movies"), doc("b", "texts"), doc("c", "audio"), doc("d", "image")];

        add_image_thumbs_to_docs(&mut docs, &source).await;

        assert!(docs[0].image_thumbnail.is_none());
        assert_eq!(docs[1].image_thumbnail.as_deref(), Some("http://h/b/__ia_thumb.jpg"));
        assert!(docs[2].image_thumbnail.is_none());
        assert!(docs[3].image_thumbnail.is_none());
        assert!(docs.iter().all(|d| d.thumbnails.is_none()));
    }
}
