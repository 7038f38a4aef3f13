//! Chunk linking
//!
//! Resolves `link_after` constraints into one total order per file type and
//! serialises the ordered chunks into file text.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use super::{Chunk, ChunkStore, FileType};
use crate::error::{GenerationError, Result};
use crate::render;

/// Order chunks so every chunk follows the chunks named in its `link_after`.
///
/// Returns indices into `chunks`. Among chunks that are ready at the same time
/// the one inserted first wins, so the order only depends on insertion order
/// and constraints. Dangling references and cycles are errors.
pub fn resolve_order(file_type: FileType, chunks: &[&Chunk]) -> Result<Vec<usize>> {
    let index: HashMap<&str, usize> = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| (chunk.name.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; chunks.len()];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); chunks.len()];

    for (i, chunk) in chunks.iter().enumerate() {
        for predecessor in &chunk.link_after {
            let Some(&p) = index.get(predecessor.as_str()) else {
                return Err(GenerationError::UnresolvedLink {
                    chunk: chunk.name.clone(),
                    missing: predecessor.clone(),
                    file_type,
                });
            };
            successors[p].push(i);
            in_degree[i] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, degree)| **degree == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(chunks.len());
    while let Some(Reverse(i)) = ready.pop() {
        order.push(i);
        for &next in &successors[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() < chunks.len() {
        return Err(GenerationError::LinkCycle {
            file_type,
            chunks: cycle_members(chunks, &in_degree, &successors),
        });
    }

    Ok(order)
}

/// Names of the unplaced chunks that lie on a cycle.
///
/// Unplaced chunks downstream of a cycle are pruned by repeatedly removing
/// those without unplaced successors.
fn cycle_members(chunks: &[&Chunk], in_degree: &[usize], successors: &[Vec<usize>]) -> Vec<String> {
    let mut remaining: Vec<bool> = in_degree.iter().map(|degree| *degree > 0).collect();

    loop {
        let sinks: Vec<usize> = (0..chunks.len())
            .filter(|&i| remaining[i] && !successors[i].iter().any(|&s| remaining[s]))
            .collect();
        if sinks.is_empty() {
            break;
        }
        for i in sinks {
            remaining[i] = false;
        }
    }

    (0..chunks.len())
        .filter(|&i| remaining[i])
        .map(|i| chunks[i].name.clone())
        .collect()
}

impl ChunkStore {
    /// Link the chunks of one file type into the final file text
    pub fn link(&self, file_type: FileType) -> Result<String> {
        let chunks: Vec<&Chunk> = self.of_type(file_type).collect();
        let order = resolve_order(file_type, &chunks)?;

        let mut pieces = Vec::with_capacity(order.len());
        for i in order {
            let chunk = chunks[i];
            if !chunk.emits() {
                debug!("Chunk '{}' emits no text", chunk.name);
                continue;
            }

            let representation = chunk.content.representation();
            if !file_type.accepts(representation) {
                return Err(GenerationError::UnsupportedRepresentation {
                    chunk: chunk.name.clone(),
                    representation,
                    file_type,
                });
            }

            pieces.push(render::render(&chunk.content));
        }

        debug!("Linked {} {} chunk(s)", pieces.len(), file_type);

        Ok(pieces.join("\n"))
    }

    /// Link every file type present, in order of first appearance
    pub fn link_all(&self) -> Result<Vec<(FileType, String)>> {
        self.file_types()
            .into_iter()
            .map(|file_type| Ok((file_type, self.link(file_type)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkFlag;
    use crate::render::markup::MarkupNode;

    fn store(chunks: Vec<Chunk>) -> ChunkStore {
        chunks.into_iter().collect()
    }

    #[test]
    fn test_unrelated_chunks_keep_insertion_order() {
        let chunks = store(vec![
            Chunk::text("zeta", FileType::Js, "z"),
            Chunk::text("alpha", FileType::Js, "a"),
            Chunk::text("mid", FileType::Js, "m"),
        ]);
        assert_eq!(chunks.link(FileType::Js).unwrap(), "z\na\nm");
    }

    #[test]
    fn test_link_after_moves_chunk_behind_predecessor() {
        let chunks = store(vec![
            Chunk::text("component", FileType::Js, "component").link_after(["imports"]),
            Chunk::text("export", FileType::Js, "export").link_after(["component"]),
            Chunk::text("imports", FileType::Js, "imports"),
        ]);
        assert_eq!(
            chunks.link(FileType::Js).unwrap(),
            "imports\ncomponent\nexport"
        );
    }

    #[test]
    fn test_linking_is_deterministic() {
        let chunks = store(vec![
            Chunk::text("c", FileType::Js, "c").link_after(["a"]),
            Chunk::text("b", FileType::Js, "b"),
            Chunk::text("a", FileType::Js, "a"),
            Chunk::text("d", FileType::Js, "d").link_after(["b", "c"]),
        ]);
        let first = chunks.link(FileType::Js).unwrap();
        for _ in 0..10 {
            assert_eq!(chunks.link(FileType::Js).unwrap(), first);
        }
        assert_eq!(first, "b\na\nc\nd");
    }

    #[test]
    fn test_cycle_is_reported_with_members() {
        let chunks = store(vec![
            Chunk::text("head", FileType::Js, "head"),
            Chunk::text("a", FileType::Js, "a").link_after(["b"]),
            Chunk::text("b", FileType::Js, "b").link_after(["a"]),
            Chunk::text("tail", FileType::Js, "tail").link_after(["b"]),
        ]);
        match chunks.link(FileType::Js).unwrap_err() {
            GenerationError::LinkCycle { chunks, .. } => {
                assert_eq!(chunks, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let chunks = store(vec![Chunk::text("a", FileType::Js, "a").link_after(["a"])]);
        assert!(matches!(
            chunks.link(FileType::Js),
            Err(GenerationError::LinkCycle { .. })
        ));
    }

    #[test]
    fn test_dangling_link_after_fails() {
        let chunks = store(vec![
            Chunk::text("a", FileType::Js, "a").link_after(["imports"]),
            Chunk::text("imports", FileType::Css, ""),
        ]);
        match chunks.link(FileType::Js).unwrap_err() {
            GenerationError::UnresolvedLink { chunk, missing, .. } => {
                assert_eq!(chunk, "a");
                assert_eq!(missing, "imports");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_silent_chunks_order_but_do_not_emit() {
        let chunks = store(vec![
            Chunk::text("body", FileType::Js, "body").link_after(["imports"]),
            Chunk::text("imports", FileType::Js, "ignored").with_flag(ChunkFlag::Hidden),
            Chunk::import_only("style-import", FileType::Js, Vec::new()),
        ]);
        assert_eq!(chunks.link(FileType::Js).unwrap(), "body");
    }

    #[test]
    fn test_markup_in_css_is_rejected() {
        let chunks = store(vec![Chunk::markup(
            "template",
            FileType::Css,
            MarkupNode::new("div"),
        )]);
        assert!(matches!(
            chunks.link(FileType::Css),
            Err(GenerationError::UnsupportedRepresentation { .. })
        ));
    }
}
