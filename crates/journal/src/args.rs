use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "journal")]
#[command(about = "Lab journal for chemistry, hematology and clinical chemistry practicals", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root folder of the data store (defaults to the OS data directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new user
    Register {
        username: String,

        /// Display name, defaults to the username
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        password: String,
    },

    /// Verify a user's credentials
    Login {
        username: String,

        #[arg(long)]
        password: String,
    },

    /// Save a new journal entry
    Save {
        /// Subject: chemie, haematologie, klinische_chemie
        #[arg(short, long)]
        subject: String,

        #[arg(short, long)]
        user: String,

        #[arg(short, long)]
        title: String,

        /// Entry date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long, default_value = "")]
        material: String,

        #[arg(long, default_value = "")]
        questions: String,

        #[arg(long, default_value = "")]
        steps: String,

        #[arg(long, default_value = "")]
        goal: String,

        #[arg(long, default_value = "")]
        semester: String,

        /// Image files to attach
        #[arg(long)]
        image: Vec<PathBuf>,

        /// Documents (PDF, Word) to attach
        #[arg(long)]
        attach: Vec<PathBuf>,
    },

    /// List saved entries
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        subject: String,

        #[arg(short, long)]
        user: String,

        /// Search term matched against title and date
        #[arg(long)]
        search: Option<String>,
    },

    /// Download an entry's document and attachments
    Fetch {
        #[arg(short, long)]
        subject: String,

        #[arg(short, long)]
        user: String,

        /// 1-based entry number as shown by `list`
        index: usize,

        /// Output directory, defaults to the current one
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Verify and repair dataset consistency
    Doctor {
        #[arg(short, long)]
        user: String,
    },
}
