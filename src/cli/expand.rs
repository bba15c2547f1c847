//! Inspection commands: expand, phonetic, terms

use anyhow::Result;
use serde_json::json;

use crate::cli::{build_pipeline, ExpandArgs, PhoneticArgs, TermsArgs};
use crate::core::config::Config;
use crate::output::{human, json};
use crate::phonetic::PhoneticEncoder;

pub async fn run_expand(args: ExpandArgs) -> Result<()> {
    let config = Config::load()?;
    let pipeline = build_pipeline(&config, args.local);

    let names = pipeline.expand_name(&args.name).await;

    if args.json {
        println!("{}", json::format(&json!({ "name": args.name.trim(), "names": names })));
    } else {
        print!("{}", human::format_expansion(&args.name, &names));
    }
    Ok(())
}

pub fn run_phonetic(args: PhoneticArgs) -> Result<()> {
    let config = Config::load()?;
    let code = PhoneticEncoder::from_config(&config.phonetic).encode(&args.term);

    if args.json {
        println!("{}", json::format(&code));
    } else {
        print!("{}", human::format_phonetic(&args.term, &code));
    }
    Ok(())
}

pub async fn run_terms(args: TermsArgs) -> Result<()> {
    let config = Config::load()?;
    let pipeline = build_pipeline(&config, args.local);

    println!("{}", pipeline.build_search_terms(&args.query).await);
    Ok(())
}
