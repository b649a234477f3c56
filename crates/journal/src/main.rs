use anyhow::{anyhow, Context};
use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use journalapp::commands::{CmdResult, EntryDraft, MessageLevel};
use journalapp::export::TextRenderer;
use journalapp::model::Subject;
use journalapp::store::{FsBlobStore, NamedBlob};
use journalapp::{JournalApi, JournalConfig};
use std::fs;
use std::path::PathBuf;

mod args;
use args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    if let Err(err) = run(cli) {
        eprintln!("{} {}", "Error:".red(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let proj_dirs = ProjectDirs::from("com", "melinja", "laborjournal")
        .ok_or_else(|| anyhow!("could not determine data directory"))?;

    let config = JournalConfig::load(&proj_dirs.config_dir().join("journal.toml"))?;
    let root = match &cli.root {
        Some(path) => path.clone(),
        None => proj_dirs.data_dir().join(&config.fs_root_folder),
    };

    let mut api = JournalApi::new(FsBlobStore::new(root), &config);

    match cli.command {
        Commands::Register {
            username,
            name,
            password,
        } => {
            let display_name = name.unwrap_or_else(|| username.clone());
            let result = api.register(&username, &display_name, &password)?;
            print_messages(&result);
        }

        Commands::Login { username, password } => {
            api.login(&username, &password)?;
            println!("{} Logged in as {}.", "✓".green(), username.bold());
        }

        Commands::Save {
            subject,
            user,
            title,
            date,
            description,
            material,
            questions,
            steps,
            goal,
            semester,
            image,
            attach,
        } => {
            let subject = parse_subject(&subject)?;
            api.open_session(&user);

            let draft = EntryDraft {
                title,
                date: date.unwrap_or_else(|| {
                    chrono::Local::now().format("%Y-%m-%d").to_string()
                }),
                description,
                material,
                questions,
                steps,
                goal,
                semester,
                images: read_uploads(&image)?,
                documents: read_uploads(&attach)?,
            };

            let result = api.save_entry(subject, draft, &TextRenderer)?;
            print_messages(&result);
        }

        Commands::List {
            subject,
            user,
            search,
        } => {
            let subject = parse_subject(&subject)?;
            api.open_session(&user);

            let result = api.entries(subject, search.as_deref())?;
            print_messages(&result);
            for (position, entry) in result.entries.iter().enumerate() {
                let attachments = if entry.attachments.is_empty() {
                    String::new()
                } else {
                    format!("  [{} attachment(s)]", entry.attachments.len())
                };
                println!(
                    "{:<4} {}  {}{}",
                    (position + 1).to_string().green(),
                    entry.date,
                    entry.title.bold(),
                    attachments.dimmed()
                );
            }
        }

        Commands::Fetch {
            subject,
            user,
            index,
            out,
        } => {
            let subject = parse_subject(&subject)?;
            api.open_session(&user);

            if index == 0 {
                return Err(anyhow!("entry numbers start at 1"));
            }
            let result = api.fetch(subject, index - 1)?;
            print_messages(&result);

            let out_dir = out.unwrap_or_else(|| PathBuf::from("."));
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;

            for document in &result.documents {
                fs::write(out_dir.join(&document.name), &document.bytes)?;
                println!("{} {}", "⬇".green(), document.name);
            }
            for attachment in &result.attachments {
                if let Some(bytes) = attachment.bytes() {
                    fs::write(out_dir.join(&attachment.name), bytes)?;
                    println!("{} {}", "⬇".green(), attachment.name);
                }
            }
        }

        Commands::Doctor { user } => {
            api.open_session(&user);
            let result = api.doctor()?;
            print_messages(&result);
        }
    }

    Ok(())
}

fn parse_subject(input: &str) -> anyhow::Result<Subject> {
    Subject::from_key(input).ok_or_else(|| {
        anyhow!(
            "unknown subject '{}' (expected chemie, haematologie or klinische_chemie)",
            input
        )
    })
}

fn read_uploads(paths: &[PathBuf]) -> anyhow::Result<Vec<NamedBlob>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("invalid file name: {}", path.display()))?;
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        uploads.push(NamedBlob::new(name, bytes));
    }
    Ok(uploads)
}

fn print_messages(result: &CmdResult) {
    for message in &result.messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{} {}", "✓".green(), message.content),
            MessageLevel::Warning => println!("{} {}", "⚠".yellow(), message.content.yellow()),
            MessageLevel::Error => eprintln!("{} {}", "✗".red(), message.content.red()),
        }
    }
}
