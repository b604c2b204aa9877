use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use burrow::dns::question::Question;
use burrow::dns::record::{RData, ResourceRecord};
use burrow::dns::{QClass, QType};
use burrow::{Cache, NullTracer, Resolver, Tracer};

mod args;
mod display;

use args::Args;
use display::ConsoleTracer;

// The root zone's nameservers, from the IANA root hints file.
const ROOT_HINTS: &[(&str, [u8; 4])] = &[
    ("a.root-servers.net", [198, 41, 0, 4]),
    ("b.root-servers.net", [170, 247, 170, 2]),
    ("c.root-servers.net", [192, 33, 4, 12]),
    ("d.root-servers.net", [199, 7, 91, 13]),
    ("e.root-servers.net", [192, 203, 230, 10]),
    ("f.root-servers.net", [192, 5, 5, 241]),
    ("g.root-servers.net", [192, 112, 36, 4]),
    ("h.root-servers.net", [198, 97, 190, 53]),
    ("i.root-servers.net", [192, 36, 148, 17]),
    ("j.root-servers.net", [192, 58, 128, 30]),
    ("k.root-servers.net", [193, 0, 14, 129]),
    ("l.root-servers.net", [199, 7, 83, 42]),
    ("m.root-servers.net", [202, 12, 27, 33]),
];

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cache = Cache::new();
    seed_root_hints(&mut cache);
    let cache = cache.into_shared();

    let tracer: Arc<dyn Tracer> = if args.verbose {
        Arc::new(ConsoleTracer)
    } else {
        Arc::new(NullTracer)
    };

    let mut resolver = Resolver::new(args.server.as_deref(), cache, tracer)?;
    let question = Question::new(args.domain.as_str(), args.qtype, QClass::IN);
    let records = resolver.get_recursive(&question, args.depth)?;
    resolver.close();

    if records.is_empty() {
        println!("no records found for {}", question.qname);
    } else {
        for record in &records {
            println!("{}", record);
        }
    }
    Ok(())
}

fn seed_root_hints(cache: &mut Cache) {
    for (name, address) in ROOT_HINTS {
        cache.seed(ResourceRecord::new(
            Cache::root_question(),
            0,
            RData::Name((*name).to_owned()),
        ));
        cache.seed(ResourceRecord::new(
            Question::new(*name, QType::A, QClass::IN),
            0,
            RData::A(Ipv4Addr::from(*address)),
        ));
    }
}
