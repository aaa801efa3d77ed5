use colored::Colorize;
use domain_work_order::model::vo::{Column, FilterField};
use indoc::indoc;
use service_work_order::ListView;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::work_order::{load, print_view};
use crate::{args::split_pair, args::FilterArgs, infrastructure::ServiceProvider, render};

const HELP: &str = indoc! {"
    Type to search; the list refreshes once you stop typing.
      :n / :p           next / previous page
      :page N           jump to page N
      :f name=value     set a filter (empty value clears it)
      :cols a,b,c       visible columns
      :clear            drop all filters
      :q                quit
"};

/// One line typed at the browse prompt.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Search(&'a str),
    Next,
    Previous,
    Page(u32),
    Filter(&'a str),
    Columns(&'a str),
    Clear,
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Input<'_>, String> {
    let Some(command) = line.trim().strip_prefix(':') else {
        return Ok(Input::Search(line));
    };
    let (name, rest) = command
        .split_once(char::is_whitespace)
        .map(|(name, rest)| (name, rest.trim()))
        .unwrap_or((command, ""));
    match name {
        "n" | "next" => Ok(Input::Next),
        "p" | "prev" => Ok(Input::Previous),
        "page" => rest
            .parse()
            .map(Input::Page)
            .map_err(|_| format!("not a page number: {rest:?}")),
        "f" | "filter" => Ok(Input::Filter(rest)),
        "cols" | "columns" => Ok(Input::Columns(rest)),
        "clear" => Ok(Input::Clear),
        "h" | "help" => Ok(Input::Help),
        "q" | "quit" => Ok(Input::Quit),
        other => Err(format!("unknown command :{other}, try :help")),
    }
}

/// Apply one input. Returns whether the list needs reloading, `None` to quit.
fn apply(view: &mut ListView, input: Input<'_>) -> anyhow::Result<Option<bool>> {
    let reload = match input {
        Input::Search(text) => {
            view.type_search(text);
            false
        }
        Input::Next => view.next_page(),
        Input::Previous => view.previous_page(),
        Input::Page(page) => view.set_page(page),
        Input::Filter(pair) => {
            let (name, value) = split_pair(pair)?;
            let field = FilterField::from_name(name)
                .ok_or_else(|| anyhow::anyhow!("unknown filter: {name}"))?;
            view.set_filter(field, value)?
        }
        Input::Columns(list) => {
            let columns = list
                .split(',')
                .map(str::parse::<Column>)
                .collect::<Result<Vec<_>, _>>()?;
            view.set_columns(columns);
            print_view(view);
            false
        }
        Input::Clear => {
            view.clear_filters();
            true
        }
        Input::Help => {
            print!("{HELP}");
            false
        }
        Input::Quit => return Ok(None),
    };
    Ok(Some(reload))
}

async fn refresh(view: &mut ListView) {
    match load(view).await {
        Ok(()) => print_view(view),
        Err(e) => eprintln!("{}", render::error(&e)),
    }
}

pub async fn run(provider: &ServiceProvider, filters: FilterArgs) -> anyhow::Result<()> {
    let mut view = provider.list_view().await?;
    for (field, value) in filters.to_filter()?.criteria() {
        view.set_filter(field, value)?;
    }
    let searches = view.searches();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{HELP}");
    refresh(&mut view).await;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = match parse(&line) {
                    Ok(input) => input,
                    Err(message) => {
                        eprintln!("{}", message.yellow());
                        continue;
                    }
                };
                match apply(&mut view, input) {
                    Ok(Some(true)) => refresh(&mut view).await,
                    Ok(Some(false)) => {}
                    Ok(None) => break,
                    Err(e) => eprintln!("{}", render::error(&e)),
                }
            }
            Ok(search) = searches.recv_async() => {
                match view.apply_search(&search) {
                    Ok(true) => refresh(&mut view).await,
                    Ok(false) => {}
                    Err(e) => eprintln!("{}", render::error(&e.into())),
                }
            }
            Ok(signal) = provider.signals.recv_async() => {
                eprintln!("{}", render::signal(&signal));
                break;
            }
        }
    }
    Ok(())
}
