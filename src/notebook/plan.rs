//! Page ordering and link destinations.
//!
//! The table of contents links forward to content pages that have not been drawn
//! yet, and every content page links back to the contents page listing it. Both
//! depend on absolute page numbers, which in turn depend on how many TOC pages
//! there are. The [`DocumentPlan`] resolves all of this up front: it paginates the
//! TOC, fixes the role of every page in the final document, and allocates a named
//! [`Destination`] for each page before any drawing starts. Rendering only ever
//! reads from the plan.

use super::{NotebookConfig, PageGeometry};
use crate::error::{NotebookError, Result};
use crate::units::{whole_steps, Mm, Pt};
use std::ops::Range;

/// Gap between the "Table of Contents" heading baseline and the first entry.
pub const TOC_HEADER_SPACING: Pt = Pt(20.0);

/// How many TOC entries fit on the first and on subsequent TOC pages.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TocLayout {
    pub first_page_capacity: usize,
    pub later_page_capacity: usize,
}

impl TocLayout {
    pub fn new(geometry: &PageGeometry, line_spacing: Mm) -> Result<TocLayout> {
        let line_spacing: Pt = line_spacing.into();
        let usable = geometry.height - geometry.top - geometry.bottom;

        // the first page gives up room for its heading
        let heading: Pt = Mm(25.0).into();
        let top_gap: Pt = Mm(10.0).into();
        let first_page_height = usable - heading - TOC_HEADER_SPACING;
        let later_page_height = usable - TOC_HEADER_SPACING - top_gap;

        let layout = TocLayout {
            first_page_capacity: whole_steps(first_page_height, line_spacing),
            later_page_capacity: whole_steps(later_page_height, line_spacing),
        };
        if layout.later_page_capacity == 0 {
            return Err(NotebookError::invalid(format!(
                "toc_line_spacing_mm of {:.1} leaves no room for entries on a contents page",
                Mm::from(line_spacing).0
            )));
        }
        Ok(layout)
    }

    pub fn page_count(&self, entries: usize) -> usize {
        if entries <= self.first_page_capacity {
            1
        } else {
            let remaining = entries - self.first_page_capacity;
            1 + remaining.div_ceil(self.later_page_capacity)
        }
    }

    /// Split `entries` into the ranges listed on each TOC page.
    pub fn paginate(&self, entries: usize) -> Vec<Range<usize>> {
        let mut pages = Vec::with_capacity(self.page_count(entries));
        let first_end = entries.min(self.first_page_capacity);
        pages.push(0..first_end);

        let mut start = first_end;
        while start < entries {
            let end = (start + self.later_page_capacity).min(entries);
            pages.push(start..end);
            start = end;
        }
        pages
    }
}

/// What a page in the final document is for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PageRole {
    Title,
    /// Table of contents page, 0-based among TOC pages
    Toc(usize),
    /// Content page, 0-based among content pages
    Content(usize),
}

/// One line of the table of contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub label: String,
    /// 0-based content page this entry points at
    pub content_index: usize,
}

impl TocEntry {
    /// The 1-based page number printed on the page and in the TOC.
    pub fn number(&self) -> usize {
        self.content_index + 1
    }
}

/// A named anchor bound to an absolute, 0-based page index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Destination {
    pub name: String,
    pub page_index: usize,
}

/// Handle to a [`Destination`] in a [`DestinationTable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DestId(usize);

#[derive(Clone, Debug, Default)]
pub struct DestinationTable {
    destinations: Vec<Destination>,
    title: Option<DestId>,
    toc: Vec<DestId>,
    content: Vec<DestId>,
}

impl DestinationTable {
    fn push(&mut self, name: String, page_index: usize) -> DestId {
        self.destinations.push(Destination { name, page_index });
        DestId(self.destinations.len() - 1)
    }

    pub fn get(&self, id: DestId) -> &Destination {
        &self.destinations[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.destinations.iter()
    }

    pub fn title(&self) -> Option<DestId> {
        self.title
    }

    pub fn toc(&self, toc_index: usize) -> Option<DestId> {
        self.toc.get(toc_index).copied()
    }

    pub fn content(&self, content_index: usize) -> Option<DestId> {
        self.content.get(content_index).copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.destinations.len()
    }
}

/// The full page layout of one notebook, computed before rendering.
#[derive(Clone, Debug)]
pub struct DocumentPlan {
    pub roles: Vec<PageRole>,
    pub entries: Vec<TocEntry>,
    /// Which entries each TOC page lists (empty when the TOC is disabled)
    pub toc_pages: Vec<Range<usize>>,
    pub destinations: DestinationTable,
}

impl DocumentPlan {
    pub fn new(config: &NotebookConfig) -> Result<DocumentPlan> {
        let entries: Vec<TocEntry> = (0..config.num_pages)
            .map(|content_index| TocEntry {
                label: format!("Page {}", content_index + 1),
                content_index,
            })
            .collect();

        let toc_pages = if config.include_toc {
            TocLayout::new(&config.geometry(), config.toc_line_spacing)?.paginate(entries.len())
        } else {
            Vec::new()
        };

        let mut roles = Vec::with_capacity(1 + toc_pages.len() + entries.len());
        if config.include_title_page {
            roles.push(PageRole::Title);
        }
        roles.extend((0..toc_pages.len()).map(PageRole::Toc));
        roles.extend((0..entries.len()).map(PageRole::Content));

        // every page gets its destination before anything is drawn
        let mut destinations = DestinationTable::default();
        for (page_index, role) in roles.iter().enumerate() {
            match role {
                PageRole::Title => {
                    destinations.title = Some(destinations.push("title_page".into(), page_index));
                }
                PageRole::Toc(i) => {
                    let id = destinations.push(format!("toc_page_{}", i + 1), page_index);
                    destinations.toc.push(id);
                }
                PageRole::Content(i) => {
                    let id = destinations.push(format!("page_{}", i + 1), page_index);
                    destinations.content.push(id);
                }
            }
        }

        log::debug!(
            "planned {} pages: {} leading, {} TOC",
            roles.len(),
            roles.len() - entries.len(),
            toc_pages.len()
        );

        Ok(DocumentPlan {
            roles,
            entries,
            toc_pages,
            destinations,
        })
    }

    pub fn page_count(&self) -> usize {
        self.roles.len()
    }

    pub fn toc_page_count(&self) -> usize {
        self.toc_pages.len()
    }

    /// Title page plus TOC pages.
    pub fn leading_pages(&self) -> usize {
        self.roles.len() - self.entries.len()
    }

    /// Absolute page index of a content page.
    pub fn content_page_index(&self, content_index: usize) -> usize {
        self.leading_pages() + content_index
    }

    /// The TOC page (0-based among TOC pages) that lists a content page.
    pub fn toc_page_for(&self, content_index: usize) -> Option<usize> {
        self.toc_pages
            .iter()
            .position(|range| range.contains(&content_index))
    }

    /// Where a content page's number links to: the TOC page listing it, or the
    /// first page of the document when there is no TOC. Content pages never link
    /// to themselves.
    pub fn page_number_target(&self, content_index: usize) -> Option<DestId> {
        if !self.toc_pages.is_empty() {
            return self
                .toc_page_for(content_index)
                .and_then(|toc| self.destinations.toc(toc));
        }

        let first = self.destinations.iter().position(|d| d.page_index == 0)?;
        let first = DestId(first);
        if self.destinations.get(first).page_index == self.content_page_index(content_index) {
            None
        } else {
            Some(first)
        }
    }
}
