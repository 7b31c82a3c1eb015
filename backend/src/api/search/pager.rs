//! Page-number window below a result list.

use common::search_result::{PageLink, PagerWindow};

use crate::api::search::param_codec::QueryParams;

pub fn build_pager(num_found: u64, page: u64, page_size: u64, pages_in_set: u64) -> PagerWindow {
    let page_size = page_size.max(1);
    let pages_in_set = pages_in_set.max(1);
    let pages = (num_found / page_size).saturating_add(1);
    let page = page.max(1);
    let half = pages_in_set / 2;

    let (first, last) = if pages <= pages_in_set {
        (1, pages)
    } else if page < half {
        (1, pages_in_set)
    } else if page > pages - half {
        (pages - pages_in_set + 1, pages)
    } else {
        let first = page.saturating_sub(half).max(1);
        (first, first + pages_in_set - 1)
    };
    let first = first.max(1);
    let last = last.min(pages);

    PagerWindow {
        total_pages: pages,
        pages: (first..=last).collect(),
        links: Vec::new(),
    }
}

/// Query string for every page in the window.
pub fn attach_page_links(pager: &mut PagerWindow, params: &QueryParams) {
    pager.links = pager
        .pages
        .iter()
        .map(|&page| PageLink {
            page,
            href: params.changed(&[("page", Some(page.into()))]).encode(),
        })
        .collect();
}
