//! CLI for GenChat - text, image and illustrated chat via Together AI.

use clap::Parser;
use genchat::{
    ConversationOrchestrator, History, ImageGenerator, TextGenerator, TogetherClient,
    TogetherImageGenerator, TogetherTextGenerator, API_KEY_ENV,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const TEXT_PROMPT: &str = "write a 3 line post about pizza";
const IMAGE_PROMPT: &str = "Create an image of a cat";
const PAIR_PROMPT: &str = "write a 3 line post about resident evil for instagram";
const IMAGE_SIZE: u32 = 256;

#[derive(Parser)]
#[command(name = "genchat")]
#[command(about = "Generate text, images and illustrated chat replies via Together AI")]
#[command(version)]
struct Cli {
    /// Mode: 1 = text, 2 = image, 3 = text + image, 4 = interactive chat
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    option: i64,

    /// Together AI API key
    #[arg(short = 'k', long, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Directory where generated images are written
    #[arg(long, default_value = "results")]
    results_dir: PathBuf,

    /// Override the built-in prompt of modes 1-3
    #[arg(short, long)]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("genchat=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if !(1..=4).contains(&cli.option) {
        println!("Invalid option");
        return Ok(());
    }

    let mut builder = TogetherClient::builder();
    if let Some(key) = cli.api_key.as_deref() {
        builder = builder.api_key(key);
    }
    let client = builder.build()?;
    let text = TogetherTextGenerator::builder(client.clone()).build()?;
    let image = TogetherImageGenerator::builder(client).build();

    match cli.option {
        1 => print_completion(&text, cli.prompt.as_deref()).await?,
        2 => save_image(&image, cli.prompt.as_deref(), &cli.results_dir).await?,
        3 => save_text_and_image(&text, &image, cli.prompt.as_deref(), &cli.results_dir).await?,
        _ => run_chat(text, image, &cli.results_dir).await?,
    }

    Ok(())
}

fn print_response(response: &str) {
    println!("\nResponse:\n");
    println!("{response}");
    println!("{}", "-".repeat(100));
}

async fn print_completion(text: &impl TextGenerator, prompt: Option<&str>) -> anyhow::Result<()> {
    let response = text.generate(prompt.unwrap_or(TEXT_PROMPT), false).await?;
    print_response(&response);
    Ok(())
}

async fn save_image(
    image: &impl ImageGenerator,
    prompt: Option<&str>,
    results_dir: &Path,
) -> anyhow::Result<()> {
    let prompt = prompt.unwrap_or(IMAGE_PROMPT);
    println!("\nCreating Image for your prompt: {prompt} ");

    let generated = image.generate_sized(prompt, IMAGE_SIZE, IMAGE_SIZE).await?;
    let path = write_result(&generated, results_dir, "image_option_2.png")?;
    println!("\nImage saved to {}\n", path.display());
    Ok(())
}

async fn save_text_and_image(
    text: &impl TextGenerator,
    image: &impl ImageGenerator,
    prompt: Option<&str>,
    results_dir: &Path,
) -> anyhow::Result<()> {
    let text_prompt = prompt.unwrap_or(PAIR_PROMPT);
    let image_prompt = format!("give me an image that represents this '{text_prompt}'");

    let response = text.generate(text_prompt, true).await?;
    print_response(&response);

    println!("\nCreating Image for your prompt: {image_prompt}... ");
    let generated = image
        .generate_sized(&image_prompt, IMAGE_SIZE, IMAGE_SIZE)
        .await?;
    let path = write_result(&generated, results_dir, "image_option_3.png")?;
    println!("\nImage saved to {}\n", path.display());
    Ok(())
}

fn write_result(
    image: &genchat::GeneratedImage,
    results_dir: &Path,
    file_name: &str,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(results_dir)?;
    let path = results_dir.join(file_name);
    image.save(&path)?;
    Ok(path)
}

/// Names chat images with a counter that survives `/clear`.
struct ChatImages<'a> {
    results_dir: &'a Path,
    saved: usize,
}

impl<'a> ChatImages<'a> {
    fn new(results_dir: &'a Path) -> Self {
        Self {
            results_dir,
            saved: 0,
        }
    }

    fn next_file_name(&mut self) -> String {
        self.saved += 1;
        format!("chat_{}.png", self.saved)
    }

    fn save(&mut self, image: &genchat::GeneratedImage) -> anyhow::Result<PathBuf> {
        let file_name = self.next_file_name();
        write_result(image, self.results_dir, &file_name)
    }
}

async fn run_chat(
    text: TogetherTextGenerator,
    image: TogetherImageGenerator,
    results_dir: &Path,
) -> anyhow::Result<()> {
    let chat = ConversationOrchestrator::new(Arc::new(text), Arc::new(image));
    let mut editor = DefaultEditor::new()?;
    let mut history = History::new();
    let mut images = ChatImages::new(results_dir);

    println!("## Creative Ideas to be Creative");
    println!("Enter your message below and let the chatbot respond with creative ideas to be creative!");
    println!("(/clear resets the conversation, /quit exits)\n");

    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let message = line.trim();

        match message {
            "/quit" | "/exit" => break,
            "/clear" => {
                history = History::new();
                println!("Conversation cleared.\n");
                continue;
            }
            _ => {}
        }
        editor.add_history_entry(message)?;

        match chat.respond(message, &history).await {
            Ok(turn) => {
                println!("\nbot> {}\n", turn.reply());
                match images.save(&turn.image) {
                    Ok(path) => println!("[image saved to {}]\n", path.display()),
                    Err(e) => eprintln!("Failed to save image: {e}"),
                }
                history = turn.history;
            }
            Err(e) => eprintln!("Error ({:?}): {e}\n", e.category()),
        }
    }

    Ok(())
}
