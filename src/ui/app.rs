use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use iced::widget::{button, column, row, scrollable, text, text_input};
use iced::{Alignment, Element, Length, Task, Theme};
use log::{info, warn};
use rfd::FileDialog;

use super::grid::{resolve_link, GridSurface};
use super::thumbnail::generate_thumbnails;
use crate::config::{Config, ThemeChoice};
use crate::error::Result;
use crate::state::catalog::scan_directory;
use crate::state::data::Catalog;
use crate::state::session::{Binding, QueryInput, Session, Update};

/// Identifiers of the two widgets the session is bound to
const GRID_ID: &str = "images";
const FILTER_ID: &str = "filter";

/// Main application state
pub struct GalleryApp {
    /// Directory the cell links are relative to (absolute)
    dir: PathBuf,
    session: Session<GridSurface>,
    /// Current contents of the filter box
    query: String,
    /// Bumped on every keystroke; only the latest one may apply a debounced query
    query_generation: u64,
    /// Cached thumbnails by entry name
    thumbnails: HashMap<String, PathBuf>,
    thumbnail_size: u32,
    /// Status message to display to the user
    status: String,
    theme: Theme,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// The filter box changed
    QueryChanged(String),
    /// A debounce timer for this keystroke ran out
    QuerySettled(u64),
    /// User clicked an image or a format link
    OpenLink(String),
    /// User clicked the "Open Folder" button
    OpenFolder,
    /// Background scan of a folder finished
    FolderScanned(PathBuf, std::result::Result<Catalog, String>),
    /// Background thumbnail generation finished for a folder
    ThumbnailsReady(PathBuf, Vec<(String, PathBuf)>),
}

impl GalleryApp {
    /// Bind a catalog to a new window and render it once
    pub fn new(dir: PathBuf, catalog: Catalog, config: &Config) -> Result<(Self, Task<Message>)> {
        let session = start_session(catalog, config.debounce())?;
        let theme = match config.theme {
            ThemeChoice::Dark => Theme::Dark,
            ThemeChoice::Light => Theme::Light,
        };

        let mut app = GalleryApp {
            dir,
            session,
            query: String::new(),
            query_generation: 0,
            thumbnails: HashMap::new(),
            thumbnail_size: config.thumbnail_size,
            status: String::new(),
            theme,
        };
        app.update_status();
        let task = app.load_thumbnails();
        Ok((app, task))
    }

    /// Handle application messages and update state
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::QueryChanged(query) => {
                self.query = query;
                self.query_generation += 1;

                match self.session.input().debounce {
                    None => self.apply_query(),
                    Some(interval) => {
                        let generation = self.query_generation;
                        return Task::perform(
                            async move {
                                tokio::time::sleep(interval).await;
                                generation
                            },
                            Message::QuerySettled,
                        );
                    }
                }
                Task::none()
            }
            Message::QuerySettled(generation) => {
                // A newer keystroke has its own timer running
                if generation == self.query_generation {
                    self.apply_query();
                }
                Task::none()
            }
            Message::OpenLink(href) => {
                match resolve_link(&self.dir, &href) {
                    Some(url) => {
                        if let Err(e) = open::that_detached(url.as_str()) {
                            warn!("Cannot open {}: {}", url, e);
                            self.status = format!("Cannot open {}: {}", href, e);
                        }
                    }
                    None => warn!("Cannot resolve link {} against {}", href, self.dir.display()),
                }
                Task::none()
            }
            Message::OpenFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder with Plots")
                    .pick_folder();

                if let Some(folder) = folder {
                    self.status = format!("Scanning {}...", folder.display());
                    return Task::perform(scan_folder_async(folder), |(dir, result)| {
                        Message::FolderScanned(dir, result)
                    });
                }
                Task::none()
            }
            Message::FolderScanned(dir, Ok(catalog)) => {
                let debounce = self.session.input().debounce;
                match start_session(catalog, debounce) {
                    Ok(session) => {
                        self.dir = dir;
                        self.session = session;
                        self.query.clear();
                        self.query_generation += 1;
                        self.thumbnails.clear();
                        self.update_status();
                        self.load_thumbnails()
                    }
                    Err(e) => {
                        self.status = e.to_string();
                        Task::none()
                    }
                }
            }
            Message::FolderScanned(dir, Err(e)) => {
                warn!("Scan of {} failed: {}", dir.display(), e);
                self.status = format!("Cannot read {}: {}", dir.display(), e);
                Task::none()
            }
            Message::ThumbnailsReady(dir, thumbnails) => {
                // Late results for a folder that is no longer shown
                if dir == self.dir {
                    info!("{} thumbnails ready", thumbnails.len());
                    self.thumbnails.extend(thumbnails);
                }
                Task::none()
            }
        }
    }

    fn apply_query(&mut self) {
        if let Update::Rendered(_) = self.session.on_query(&self.query) {
            self.update_status();
        }
    }

    fn update_status(&mut self) {
        self.status = format!(
            "Showing {} of {} plots in {}",
            self.session.surface().count(),
            self.session.catalog().len(),
            self.dir.display()
        );
    }

    fn load_thumbnails(&self) -> Task<Message> {
        let dir = self.dir.clone();
        let names = self.session.catalog().iter().map(|e| e.name.clone()).collect();
        Task::perform(
            generate_thumbnails(dir.clone(), names, self.thumbnail_size),
            move |thumbnails| Message::ThumbnailsReady(dir.clone(), thumbnails),
        )
    }

    /// Build the user interface
    pub fn view(&self) -> Element<Message> {
        let header = row![
            text_input("Filter plots (at least 3 characters)", &self.query)
                .id(text_input::Id::new(FILTER_ID))
                .on_input(Message::QueryChanged)
                .padding(8)
                .width(Length::Fill),
            button("Open Folder")
                .on_press(Message::OpenFolder)
                .padding(8),
        ]
        .spacing(12)
        .align_y(Alignment::Center);

        let grid = self
            .session
            .surface()
            .view(&self.dir, &self.thumbnails, self.thumbnail_size as f32);

        column![
            header,
            text(&self.status).size(14),
            scrollable(grid).height(Length::Fill).width(Length::Fill),
        ]
        .spacing(12)
        .padding(20)
        .into()
    }

    pub fn title(&self) -> String {
        format!("Plot Gallery - {}", self.dir.display())
    }

    /// Set the application theme
    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }
}

fn start_session(catalog: Catalog, debounce: Option<Duration>) -> Result<Session<GridSurface>> {
    Session::start(
        catalog,
        Binding::found(GRID_ID, GridSurface::default()),
        Binding::found(FILTER_ID, QueryInput::new(debounce)),
    )
}

/// Scan a folder off the UI thread
async fn scan_folder_async(folder: PathBuf) -> (PathBuf, std::result::Result<Catalog, String>) {
    let dir = std::fs::canonicalize(&folder).unwrap_or(folder);
    let scan_dir = dir.clone();
    let result = tokio::task::spawn_blocking(move || scan_directory(&scan_dir))
        .await
        .map_err(|e| e.to_string())
        .and_then(|scan| scan.map_err(|e| e.to_string()));
    (dir, result)
}

/// Open the gallery window and block until it is closed
pub fn run(dir: PathBuf, catalog: Catalog, config: &Config) -> anyhow::Result<()> {
    let (app, task) = GalleryApp::new(dir, catalog, config)?;

    iced::application(GalleryApp::title, GalleryApp::update, GalleryApp::view)
        .theme(GalleryApp::theme)
        .centered()
        .run_with(move || (app, task))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::Entry;

    fn app(debounce_ms: u64) -> GalleryApp {
        let catalog = Catalog::new(vec![
            Entry::new("a.png", true, false, false),
            Entry::new("b.png", false, true, true),
        ]);
        let config = Config {
            debounce_ms,
            ..Config::default()
        };
        let (app, _) = GalleryApp::new(PathBuf::from("/plots"), catalog, &config).unwrap();
        app
    }

    #[test]
    fn test_starts_with_everything() {
        let app = app(0);
        assert_eq!(app.session.surface().count(), 2);
        assert_eq!(app.status, "Showing 2 of 2 plots in /plots");
    }

    #[test]
    fn test_query_applies_immediately_without_debounce() {
        let mut app = app(0);
        let _ = app.update(Message::QueryChanged("b.png".to_string()));
        assert_eq!(app.session.surface().count(), 1);
    }

    #[test]
    fn test_debounced_query_waits_for_latest_timer() {
        let mut app = app(200);
        let _ = app.update(Message::QueryChanged("a.p".to_string()));
        let _ = app.update(Message::QueryChanged("b.p".to_string()));
        assert_eq!(app.session.surface().count(), 2);

        // The first keystroke's timer is stale
        let _ = app.update(Message::QuerySettled(1));
        assert_eq!(app.session.surface().count(), 2);

        let _ = app.update(Message::QuerySettled(2));
        assert_eq!(app.session.last_view()[0].name, "b.png");
        assert_eq!(app.session.surface().count(), 1);
    }

    #[test]
    fn test_thumbnails_for_other_folder_are_ignored() {
        let mut app = app(0);
        let _ = app.update(Message::ThumbnailsReady(
            PathBuf::from("/elsewhere"),
            vec![("a.png".to_string(), PathBuf::from("/cache/1.png"))],
        ));
        assert!(app.thumbnails.is_empty());

        let _ = app.update(Message::ThumbnailsReady(
            PathBuf::from("/plots"),
            vec![("a.png".to_string(), PathBuf::from("/cache/1.png"))],
        ));
        assert_eq!(app.thumbnails.len(), 1);
    }

    #[test]
    fn test_scanned_folder_starts_new_session() {
        let mut app = app(0);
        let _ = app.update(Message::QueryChanged("zzz".to_string()));
        let catalog = Catalog::new(vec![Entry::new("c.png", false, false, false)]);
        let _ = app.update(Message::FolderScanned(PathBuf::from("/other"), Ok(catalog)));

        assert!(app.query.is_empty());
        assert_eq!(app.session.surface().count(), 1);
        assert_eq!(app.dir, PathBuf::from("/other"));
    }
}
