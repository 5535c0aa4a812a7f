//! Notebook assembly.
//!
//! Builds the [`DocumentPlan`] first, so every page already has its absolute
//! index and named destination, then draws the pages in order: the title page,
//! the contents pages and finally the content pages with their pattern and page
//! number. Links only ever refer to destinations from the plan.
//!
//! ## Document Metadata
//!
//! The document info carries the title page metadata (title, author, description
//! as the subject and tags as keywords) and identifies ink-notebook as the
//! creator.
//!
//! ## Writing
//!
//! The finished PDF is written to a temporary file next to its destination and
//! then moved into place, so a failed generation never leaves a partial file
//! behind.

pub mod page_number;
pub mod pattern;
pub mod table_of_contents;
pub mod title_page;

use crate::error::{NotebookError, Result};
use crate::notebook::{DocumentPlan, NotebookConfig, PageRole};
use crate::pdf::document::{Document, Info, Page};
use crate::pdf::fonts::FontSet;
use std::io::Write;
use std::path::Path;

/// What went into a generated notebook.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of pages in the PDF, including the title and contents pages
    pub page_count: usize,
    pub toc_page_count: usize,
    /// Clickable links across all pages
    pub link_count: usize,
    /// Size of the written file
    pub bytes: u64,
    /// Whether headings had to be set in Helvetica
    pub serif_fallback: bool,
}

/// Lay out and draw every page of a notebook.
pub fn build_document<'f>(
    config: &NotebookConfig,
    plan: &DocumentPlan,
    fonts: &'f FontSet,
) -> Result<Document<'f>> {
    let geometry = config.geometry();
    let mut doc = Document::new(
        config.page_size.dimensions(),
        fonts,
        plan.destinations.clone(),
    );

    let metadata = &config.title_metadata;
    doc.set_info(Info {
        title: Some(
            metadata
                .title
                .clone()
                .unwrap_or_else(|| title_page::HEADER.to_string()),
        ),
        author: metadata.author.clone(),
        subject: metadata.description.clone(),
        keywords: if metadata.tags.is_empty() {
            None
        } else {
            Some(metadata.tags.join(", "))
        },
        creator: Some(concat!("ink-notebook v", env!("CARGO_PKG_VERSION")).to_string()),
    });

    let mut toc_pages = table_of_contents::render(config, plan, fonts).into_iter();
    let mut mark_count = 0;
    for role in plan.roles.iter() {
        let page = match *role {
            PageRole::Title => title_page::render(config),
            PageRole::Toc(_) => toc_pages.next().unwrap_or_default(),
            PageRole::Content(content_index) => {
                let mut page = Page::new();
                mark_count += pattern::render(
                    &mut page,
                    &geometry,
                    config.pattern,
                    config.spacing,
                    config.dot_radius,
                )?;
                page_number::annotate(
                    &mut page,
                    config,
                    fonts,
                    content_index,
                    plan.page_number_target(content_index),
                );
                page
            }
        };
        doc.add_page(page);
    }
    log::debug!("drew {mark_count} pattern marks");

    let destinations = &plan.destinations;
    if let Some(title) = destinations.title() {
        doc.add_bookmark("Title", title);
    }
    if let Some(toc) = destinations.toc(0) {
        doc.add_bookmark("Table of Contents", toc);
    }
    for entry in plan.entries.iter() {
        if let Some(target) = destinations.content(entry.content_index) {
            doc.add_bookmark(entry.label.clone(), target);
        }
    }

    Ok(doc)
}

/// Render a notebook into memory.
pub fn render(config: &NotebookConfig, fonts: &FontSet) -> Result<(Vec<u8>, RenderStats)> {
    let plan = DocumentPlan::new(config)?;
    let doc = build_document(config, &plan, fonts)?;
    let link_count = doc.pages.iter().map(|page| page.links().len()).sum();

    let bytes = doc
        .write()
        .map_err(|e| NotebookError::generation("<memory>", e))?;
    let stats = RenderStats {
        page_count: plan.page_count(),
        toc_page_count: plan.toc_page_count(),
        link_count,
        bytes: bytes.len() as u64,
        serif_fallback: fonts.serif_fallback,
    };
    Ok((bytes, stats))
}

/// Render a notebook and write it to `path`.
///
/// Any failure is reported as [`NotebookError::Generation`] naming `path`, and
/// leaves nothing at `path`.
pub fn generate<P: AsRef<Path>>(
    config: &NotebookConfig,
    fonts: &FontSet,
    path: P,
) -> Result<RenderStats> {
    let path = path.as_ref();
    let (bytes, stats) = match render(config, fonts) {
        Ok(rendered) => rendered,
        // already names where it happened
        Err(NotebookError::Generation { source, .. }) => {
            return Err(NotebookError::generation(path, source))
        }
        Err(e) => return Err(NotebookError::generation(path, e)),
    };
    write_atomically(path, &bytes).map_err(|e| NotebookError::generation(path, e))?;

    log::info!(
        "wrote {} ({} pages, {} contents pages, {} links)",
        path.display(),
        stats.page_count,
        stats.toc_page_count,
        stats.link_count
    );
    Ok(stats)
}

fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notebook::PageSize;
    use crate::registry::PatternKind;
    use crate::units::Mm;
    use lopdf::{Object, ObjectId};
    use std::collections::HashMap;

    fn resolve<'a>(doc: &'a lopdf::Document, object: &'a Object) -> &'a Object {
        match object {
            Object::Reference(id) => doc.get_object(*id).expect("reference resolves"),
            other => other,
        }
    }

    /// For every page, the 0-based page indices its links jump to.
    fn link_targets(bytes: &[u8]) -> Vec<Vec<usize>> {
        let doc = lopdf::Document::load_mem(bytes).expect("lopdf can parse output");
        let pages = doc.get_pages();
        let index_of: HashMap<ObjectId, usize> = pages
            .iter()
            .map(|(number, id)| (*id, *number as usize - 1))
            .collect();

        let root = doc
            .trailer
            .get(b"Root")
            .and_then(Object::as_reference)
            .expect("has a catalog");
        let catalog = doc.get_dictionary(root).expect("catalog is a dictionary");
        let dests = resolve(&doc, catalog.get(b"Dests").expect("has named destinations"))
            .as_dict()
            .expect("dests is a dictionary");

        pages
            .values()
            .map(|page_id| {
                let page = doc.get_dictionary(*page_id).expect("page is a dictionary");
                let Ok(annots) = page.get(b"Annots") else {
                    return Vec::new();
                };
                resolve(&doc, annots)
                    .as_array()
                    .expect("annots is an array")
                    .iter()
                    .filter_map(|annot| {
                        let annot = resolve(&doc, annot).as_dict().expect("annotation");
                        if annot.get(b"Subtype").and_then(Object::as_name).ok()? != b"Link" {
                            return None;
                        }
                        let action = resolve(&doc, annot.get(b"A").expect("link has an action"))
                            .as_dict()
                            .expect("action is a dictionary");
                        let name = action.get(b"D").and_then(Object::as_name).expect("named");
                        let dest = resolve(&doc, dests.get(name).expect("destination exists"))
                            .as_array()
                            .expect("destination is an array");
                        let target = dest[0].as_reference().expect("points at a page");
                        Some(index_of[&target])
                    })
                    .collect()
            })
            .collect()
    }

    fn remarkable2() -> PageSize {
        "remarkable2".parse().unwrap()
    }

    #[test]
    fn toc_and_page_number_links_round_trip() {
        let config = NotebookConfig::builder()
            .num_pages(30usize)
            .page_size(remarkable2())
            .build()
            .unwrap();
        let (bytes, stats) = render(&config, &FontSet::standard()).unwrap();
        assert_eq!(stats.page_count, 33);
        assert_eq!(stats.toc_page_count, 2);

        let links = link_targets(&bytes);
        assert_eq!(links.len(), 33);
        assert!(links[0].is_empty());

        // 20 entries, then Cover and Next
        let first_toc = &links[1];
        let expected: Vec<usize> = (3..23).chain([0, 2]).collect();
        assert_eq!(first_toc, &expected);

        // remaining 10 entries, then Previous and Cover
        let second_toc = &links[2];
        let expected: Vec<usize> = (23..33).chain([1, 0]).collect();
        assert_eq!(second_toc, &expected);

        // each content page number jumps to the contents page listing it
        for content_index in 0..30 {
            let page_links = &links[3 + content_index];
            let toc_page = if content_index < 20 { 1 } else { 2 };
            assert_eq!(page_links, &vec![toc_page]);
        }
    }

    #[test]
    fn single_blank_page_has_no_links() {
        let config = NotebookConfig::builder()
            .num_pages(1usize)
            .pattern(PatternKind::Blank)
            .include_title_page(false)
            .include_toc(false)
            .build()
            .unwrap();
        let (bytes, stats) = render(&config, &FontSet::standard()).unwrap();
        assert_eq!(stats.page_count, 1);
        assert_eq!(stats.link_count, 0);

        let links = link_targets(&bytes);
        assert_eq!(links, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn overflowing_toc_shifts_content_pages() {
        // 40mm entries: four fit on each contents page
        let config = NotebookConfig::builder()
            .num_pages(5usize)
            .page_size(remarkable2())
            .toc_line_spacing(Mm(40.0))
            .build()
            .unwrap();
        let (bytes, stats) = render(&config, &FontSet::standard()).unwrap();
        assert_eq!(stats.toc_page_count, 2);
        assert_eq!(stats.page_count, 1 + 2 + 5);

        let links = link_targets(&bytes);
        assert_eq!(links[1], vec![3, 4, 5, 6, 0, 2]);
        assert_eq!(links[2], vec![7, 1, 0]);
        assert_eq!(links[7], vec![2]);
    }

    #[test]
    fn leading_pages_shift_link_targets() {
        for (title, toc) in [(false, false), (true, false), (false, true), (true, true)] {
            let config = NotebookConfig::builder()
                .num_pages(4usize)
                .include_title_page(title)
                .include_toc(toc)
                .build()
                .unwrap();
            let (bytes, stats) = render(&config, &FontSet::standard()).unwrap();
            let leading = title as usize + toc as usize;
            assert_eq!(stats.page_count, 4 + leading);

            let links = link_targets(&bytes);
            if toc {
                let toc_page = title as usize;
                let entries: Vec<usize> = links[toc_page].iter().take(4).copied().collect();
                assert_eq!(entries, (leading..leading + 4).collect::<Vec<_>>());
            }
            // the last content page always links to a leading page or the first page
            let last = links.last().unwrap();
            assert_eq!(last.len(), 1);
            assert!(last[0] < leading.max(1));
        }
    }

    #[test]
    fn outline_lists_every_page() {
        let config = NotebookConfig::builder().num_pages(3usize).build().unwrap();
        let (bytes, _) = render(&config, &FontSet::standard()).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        let root = doc.trailer.get(b"Root").and_then(Object::as_reference).unwrap();
        let catalog = doc.get_dictionary(root).unwrap();
        let outlines = resolve(&doc, catalog.get(b"Outlines").unwrap())
            .as_dict()
            .unwrap();
        assert_eq!(outlines.get(b"Count").and_then(Object::as_i64).unwrap(), 5);
    }

    #[test]
    fn generation_writes_the_file_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notebook.pdf");
        let config = NotebookConfig::builder().num_pages(2usize).build().unwrap();

        let stats = generate(&config, &FontSet::standard(), &path).unwrap();
        let written = std::fs::metadata(&path).unwrap().len();
        assert_eq!(stats.bytes, written);

        // no temporary files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn generation_failure_names_the_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("notebook.pdf");
        let config = NotebookConfig::builder().build().unwrap();

        match generate(&config, &FontSet::standard(), &path) {
            Err(NotebookError::Generation { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected a generation error, got {other:?}"),
        }
        assert!(!path.exists());
    }
}
