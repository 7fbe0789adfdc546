pub mod llm;
pub mod openai;
pub mod transcript;
pub mod tts;
pub mod video_id;
