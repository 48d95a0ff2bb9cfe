use clap::Parser;

const DEFAULT_TEXT: &str = "ChatTTS is a text-to-speech model designed specifically for dialogue scenario such as LLM assistant. It supports both English and Chinese languages. Our model is trained with 100,000+ hours composed of chinese and english. The open-source version on HuggingFace is a 40,000 hours pre trained model without SFT.";

#[derive(Parser, Debug)]
pub struct Args {
    /// Text to synthesize
    #[clap(default_value = DEFAULT_TEXT)]
    pub text: String,

    #[clap(long, default_value = "http://127.0.0.1:8080/api/tts")]
    pub endpoint: String,

    #[clap(long, default_value_t = 10)]
    pub thread: u32,

    #[clap(long, default_value_t = 400)]
    pub shard_length: u32,

    #[clap(long, default_value = "output.wav")]
    pub out: String,

    /// Play only, don't write the WAV file
    #[clap(long, conflicts_with = "no_play")]
    pub no_save: bool,

    /// Write the WAV file without opening an audio device
    #[clap(long)]
    pub no_play: bool,
}
