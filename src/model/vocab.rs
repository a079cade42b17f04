use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use crate::error::{Result, ParleyError};
use super::Tokenizer;

pub const EOS_TOKEN: &str = "</s>";
pub const UNK_TOKEN: &str = "<unk>";
pub const PAD_TOKEN: &str = "<pad>";

/// SentencePiece word-boundary marker
const WORD_BOUNDARY: char = '▁';

/// Tokenizer over a Marian `vocab.json` (piece -> id)
#[derive(Debug, Clone)]
pub struct VocabTokenizer {
    model_id: String,
    piece_to_id: HashMap<String, u32>,
    id_to_piece: HashMap<u32, String>,
    eos_id: u32,
    unk_id: u32,
    pad_id: Option<u32>,
    /// Longest piece, in chars
    max_piece_chars: usize,
}

impl VocabTokenizer {
    pub fn from_vocab(model_id: &str, piece_to_id: HashMap<String, u32>) -> Result<Self> {
        let eos_id = *piece_to_id
            .get(EOS_TOKEN)
            .ok_or_else(|| ParleyError::resource_load(model_id, format!("vocabulary has no {} token", EOS_TOKEN)))?;
        let unk_id = *piece_to_id
            .get(UNK_TOKEN)
            .ok_or_else(|| ParleyError::resource_load(model_id, format!("vocabulary has no {} token", UNK_TOKEN)))?;
        let pad_id = piece_to_id.get(PAD_TOKEN).copied();

        let id_to_piece = piece_to_id
            .iter()
            .map(|(piece, id)| (*id, piece.clone()))
            .collect();
        let max_piece_chars = piece_to_id
            .keys()
            .map(|piece| piece.chars().count())
            .max()
            .unwrap_or(1);

        debug!("Vocabulary for {} has {} pieces", model_id, piece_to_id.len());

        Ok(Self {
            model_id: model_id.to_string(),
            piece_to_id,
            id_to_piece,
            eos_id,
            unk_id,
            pad_id,
            max_piece_chars,
        })
    }

    /// Read and deserialize a `vocab.json` file
    pub fn from_file<P: AsRef<Path>>(model_id: &str, path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ParleyError::resource_load(model_id, format!("cannot read {}: {}", path.display(), e)))?;
        let vocab: HashMap<String, u32> = serde_json::from_str(&content)
            .map_err(|e| ParleyError::resource_load(model_id, format!("malformed {}: {}", path.display(), e)))?;
        Self::from_vocab(model_id, vocab)
    }

    pub fn len(&self) -> usize {
        self.piece_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.piece_to_id.is_empty()
    }

    fn is_special(&self, id: u32) -> bool {
        id == self.eos_id || id == self.unk_id || Some(id) == self.pad_id
    }

    /// Greedy longest-match segmentation of one boundary-prefixed word
    fn encode_word(&self, word: &str, ids: &mut Vec<u32>) {
        let chars: Vec<char> = std::iter::once(WORD_BOUNDARY).chain(word.chars()).collect();
        let mut start = 0;

        while start < chars.len() {
            let longest = (chars.len() - start).min(self.max_piece_chars);
            let matched = (1..=longest).rev().find_map(|len| {
                let candidate: String = chars[start..start + len].iter().collect();
                self.piece_to_id.get(&candidate).map(|id| (*id, len))
            });

            match matched {
                Some((id, len)) => {
                    ids.push(id);
                    start += len;
                }
                None => {
                    // A lone boundary marker is not worth an <unk>
                    if chars[start] != WORD_BOUNDARY {
                        ids.push(self.unk_id);
                    }
                    start += 1;
                }
            }
        }
    }
}

impl Tokenizer for VocabTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let mut ids = Vec::new();
        for word in text.split_whitespace() {
            self.encode_word(word, &mut ids);
        }
        ids.push(self.eos_id);
        Ok(ids)
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        let mut text = String::new();
        for id in ids.iter().copied().filter(|id| !self.is_special(*id)) {
            let piece = self.id_to_piece.get(&id).ok_or_else(|| {
                ParleyError::inference(&self.model_id, format!("generated id {} is outside the vocabulary", id))
            })?;
            text.push_str(piece);
        }

        Ok(text.replace(WORD_BOUNDARY, " ").trim().to_string())
    }
}
