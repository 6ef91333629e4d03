//! Interactive session: one page at a time, commands on stdin, loads in the background.
//!
//! Every navigation or retry spawns a load task that reports back over a
//! channel with the [`LoadTicket`] it was started with. Results whose ticket
//! is no longer current are dropped, so quickly opening post 1 then post 2
//! always ends on post 2.

use std::{fmt, io::Write};

use anyhow::Result;
use client_core::{BlogClient, LoadTicket, PageSlot, PostDetailData, PostListData, ViewState};
use shared::{
    domain::User,
    protocol::{Route, RouteError},
};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc,
};
use tracing::{debug, warn};

use crate::render;

pub const HELP: &str = "\
commands:
  home | /             list posts
  authors | /authors   list authors
  post <id> | /post/<id>
  search <term>        filter the current list (empty term clears)
  retry                reload the current page
  help
  quit";

/// Where the session is. Post ids stay as typed until the post page loads
/// them, so `post abc` lands on the post page's not-found state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Home,
    Authors,
    Post(String),
}

impl From<Route> for Location {
    fn from(route: Route) -> Self {
        match route {
            Route::Home => Location::Home,
            Route::Authors => Location::Authors,
            Route::Post(post_id) => Location::Post(post_id.to_string()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Home => write!(f, "{}", Route::Home),
            Location::Authors => write!(f, "{}", Route::Authors),
            Location::Post(raw) => write!(f, "/post/{raw}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Go(Location),
    Search(String),
    Retry,
    Help,
    Quit,
}

/// `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>, RouteError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line.starts_with('/') {
        let location = match line.parse::<Route>() {
            Ok(route) => Location::from(route),
            Err(RouteError::InvalidPostId(err)) => Location::Post(err.raw),
            Err(err) => return Err(err),
        };
        return Ok(Some(BrowseCommand::Go(location)));
    }

    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let command = match word.to_ascii_lowercase().as_str() {
        "home" => BrowseCommand::Go(Location::Home),
        "authors" => BrowseCommand::Go(Location::Authors),
        "post" => BrowseCommand::Go(Location::Post(rest.trim().to_string())),
        "search" => BrowseCommand::Search(rest.trim().to_string()),
        "retry" => BrowseCommand::Retry,
        "quit" | "exit" | "q" => BrowseCommand::Quit,
        "help" | "?" => BrowseCommand::Help,
        _ => return Err(RouteError::UnknownPath(line.to_string())),
    };
    Ok(Some(command))
}

#[derive(Debug)]
pub enum PageEvent {
    Home {
        ticket: LoadTicket,
        state: ViewState<PostListData>,
    },
    Authors {
        ticket: LoadTicket,
        state: ViewState<Vec<User>>,
    },
    Post {
        ticket: LoadTicket,
        state: ViewState<PostDetailData>,
    },
}

pub struct Session {
    client: BlogClient,
    popular_authors: usize,
    location: Location,
    search: String,
    home: PageSlot<PostListData>,
    authors: PageSlot<Vec<User>>,
    post: PageSlot<PostDetailData>,
    events: mpsc::UnboundedSender<PageEvent>,
}

impl Session {
    pub fn new(
        client: BlogClient,
        popular_authors: usize,
        events: mpsc::UnboundedSender<PageEvent>,
    ) -> Self {
        Self {
            client,
            popular_authors,
            location: Location::Home,
            search: String::new(),
            home: PageSlot::new(),
            authors: PageSlot::new(),
            post: PageSlot::new(),
            events,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Leaving a page drops its data; the new page always starts from a fresh load.
    pub fn navigate(&mut self, location: Location) {
        self.home.reset();
        self.authors.reset();
        self.post.reset();
        self.location = location;
        self.search.clear();
        self.reload();
    }

    pub fn reload(&mut self) {
        let events = self.events.clone();
        match &self.location {
            Location::Home => {
                let ticket = self.home.begin();
                let aggregator = self.client.post_list();
                tokio::spawn(async move {
                    let state = aggregator.load_view().await;
                    let _ = events.send(PageEvent::Home { ticket, state });
                });
            }
            Location::Authors => {
                let ticket = self.authors.begin();
                let aggregator = self.client.author_list();
                tokio::spawn(async move {
                    let state = aggregator.load_view().await;
                    let _ = events.send(PageEvent::Authors { ticket, state });
                });
            }
            Location::Post(raw_post_id) => {
                let ticket = self.post.begin();
                let aggregator = self.client.post_detail();
                let raw_post_id = raw_post_id.clone();
                tokio::spawn(async move {
                    let state = aggregator.load_param_view(&raw_post_id).await;
                    let _ = events.send(PageEvent::Post { ticket, state });
                });
            }
        }
        debug!(location = %self.location, "load started");
    }

    pub fn set_search(&mut self, term: String) -> bool {
        match self.location {
            Location::Home | Location::Authors => {
                self.search = term;
                true
            }
            Location::Post(_) => false,
        }
    }

    /// Returns whether the event changed what the current page shows.
    pub fn apply(&mut self, event: PageEvent) -> bool {
        let applied = match event {
            PageEvent::Home { ticket, state } => self.home.complete(ticket, state),
            PageEvent::Authors { ticket, state } => self.authors.complete(ticket, state),
            PageEvent::Post { ticket, state } => self.post.complete(ticket, state),
        };
        if !applied {
            warn!(location = %self.location, "discarding stale page result");
        }
        applied
    }

    pub fn is_loading(&self) -> bool {
        match self.location {
            Location::Home => self.home.state().is_loading(),
            Location::Authors => self.authors.state().is_loading(),
            Location::Post(_) => self.post.state().is_loading(),
        }
    }

    pub fn render(&self) -> String {
        match self.location {
            Location::Home => {
                render::render_home(self.home.state(), &self.search, self.popular_authors)
            }
            Location::Authors => render::render_authors(self.authors.state(), &self.search),
            Location::Post(_) => render::render_post(self.post.state()),
        }
    }
}

fn show<W: Write>(output: &mut W, session: &Session) -> Result<()> {
    writeln!(output, "---- {} ----", session.location())?;
    write!(output, "{}", session.render())?;
    output.flush()?;
    Ok(())
}

/// Runs until `quit` or end of input. At end of input the current page is
/// allowed to finish loading before returning.
pub async fn run<R, W>(
    client: BlogClient,
    popular_authors: usize,
    input: R,
    output: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut session = Session::new(client, popular_authors, events_tx);
    let mut lines = input.lines();

    session.navigate(Location::Home);
    show(output, &session)?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(BrowseCommand::Quit)) => return Ok(()),
                    Ok(Some(BrowseCommand::Help)) => writeln!(output, "{HELP}")?,
                    Ok(Some(BrowseCommand::Go(location))) => {
                        session.navigate(location);
                        show(output, &session)?;
                    }
                    Ok(Some(BrowseCommand::Retry)) => {
                        session.reload();
                        show(output, &session)?;
                    }
                    Ok(Some(BrowseCommand::Search(term))) => {
                        if session.set_search(term) {
                            show(output, &session)?;
                        } else {
                            writeln!(output, "search works on the home and authors pages")?;
                        }
                    }
                    Err(err) => writeln!(output, "{err} (type `help`)")?,
                }
            }
            Some(event) = events_rx.recv() => {
                if session.apply(event) {
                    show(output, &session)?;
                }
            }
        }
    }

    while session.is_loading() {
        let Some(event) = events_rx.recv().await else {
            break;
        };
        if session.apply(event) {
            show(output, &session)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/browse_tests.rs"]
mod tests;
