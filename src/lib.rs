pub mod config;
pub mod corrections;
pub mod language;
pub mod optimizer;
pub mod pipeline;
pub mod reader;
pub mod scoring;
pub mod sentence_splitter;
pub mod stt;
pub mod summarizer;
pub mod tokenizer;

// Re-export the core text operations
pub use language::{classify, Language};
pub use optimizer::{optimize, Style};
pub use sentence_splitter::{split_sentences, Sentence, SentenceSplitter};
pub use summarizer::{summarize, Strategy, Summarizer};
pub use tokenizer::{tokenize, Tokenizer};

// Re-export configuration and the request/response surface
pub use config::{AppConfig, SttConfig};
pub use corrections::{CorrectionConfig, Corrector};
pub use pipeline::{
    AiOptions, AiResponse, AiTextRequest, AudioInput, OptimizeRequest, OptimizeResponse,
    ReadyResponse, SttResponse, SummarizeRequest, SummarizeResponse,
};
pub use stt::{is_engine_unavailable, EngineUnavailable, SttService, Transcriber, Transcript};
