use clap::Parser;

use burrow::dns::QType;

/// Iterative DNS lookup, walking the hierarchy from a root nameserver.
#[derive(Parser, Debug)]
#[command(name = "burrow", version)]
pub struct Args {
    /// Host name to look up
    pub domain: String,

    /// Record type to ask for (mnemonic or numeric)
    #[arg(short, long, default_value = "A")]
    pub qtype: QType,

    /// Where to start: an IPv4 address, a host name, "root" or "random"
    #[arg(short, long)]
    pub server: Option<String>,

    /// How many CNAME links to follow
    #[arg(long, default_value_t = 10)]
    pub depth: i32,

    /// Print the full exchange while resolving
    #[arg(short, long)]
    pub verbose: bool,
}
