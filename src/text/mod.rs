//! Text featurization: tokenization, stop words, and TF-IDF vectors.

pub mod stop_words;
pub mod tfidf;
pub mod tokenizer;

pub use tfidf::{TfidfMatrix, TfidfVectorizer};
pub use tokenizer::{tokenize, word_ngrams};
