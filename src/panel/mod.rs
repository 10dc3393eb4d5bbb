//! Panel state and the actions that drive it
//!
//! [`Panel`] owns every piece of UI state. Widgets never mutate it directly
//! except for plain text edits; everything else goes through
//! [`Panel::dispatch`]. Actions that need the host or the network return a
//! [`Task`]; the event it resolves to is fed back through [`Panel::apply`],
//! which may start a follow-up task.

use chrono::Local;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::client::{RefineClient, RefineResponse};
use crate::config::Config;
use crate::host::{CopyResult, Host};
use crate::images::ImageRef;
use crate::job::{PrintForm, PrintJobRequest};
use crate::notify::{NotificationKind, Notifier, Surface};
use crate::params::{ParamForm, RowId};
use crate::resolver::{PathResolver, ResolvedPath};

mod tasks;


pub type Task = Pin<Box<dyn Future<Output = PanelEvent> + Send + 'static>>;

fn task(future: impl Future<Output = PanelEvent> + Send + 'static) -> Option<Task> {
    Some(Box::pin(future))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    ApiTest,
    TestPrint,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::ApiTest, Tab::TestPrint];

    /// Stable key of the tab
    pub fn key(self) -> &'static str {
        match self {
            Tab::ApiTest => "api-test",
            Tab::TestPrint => "test-print",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::ApiTest => "API Test",
            Tab::TestPrint => "Test Print",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryState {
    Loading,
    Empty,
    Failed(String),
    Ready(Vec<ImageRef>),
}

impl GalleryState {
    pub fn images(&self) -> &[ImageRef] {
        match self {
            GalleryState::Ready(images) => images,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadImages,
    SelectImage(usize),
    DeleteImage(usize),
    OpenFile,
    SwitchTab(Tab),
    AddParam,
    RemoveParam(RowId),
    SubmitApi,
    SendPrint,
    DismissNotification,
}

#[derive(Debug)]
pub enum PanelEvent {
    ImagesLoaded(Result<Vec<ImageRef>, String>),
    ImageCopied {
        source: String,
        result: Result<CopyResult, String>,
    },
    ImageDeleted {
        path: String,
        result: Result<(), String>,
    },
    FileOpened {
        path: String,
        result: Result<(), String>,
    },
    PrintPrepared {
        request: PrintJobRequest,
        resolved: ResolvedPath,
    },
    PrintFinished(Result<RefineResponse, String>),
    ApiFinished {
        resolved: Option<ResolvedPath>,
        result: Result<RefineResponse, String>,
    },
}

/// Borrowed view of the Test Print tab for rendering
pub struct PrintTab<'a> {
    pub form: &'a mut PrintForm,
    pub gallery: &'a GalleryState,
    pub selected: Option<usize>,
    pub preview_uri: Option<&'a str>,
    pub open_target: Option<&'a str>,
    pub payload: &'a str,
    pub result: &'a str,
    pub busy: bool,
}

/// Borrowed view of the API Test tab for rendering
pub struct ApiTab<'a> {
    pub params: &'a mut ParamForm,
    pub endpoint: &'a str,
    pub result: &'a str,
    pub busy: bool,
}

pub struct Panel {
    host: Arc<dyn Host>,
    resolver: PathResolver,
    client: RefineClient,
    fallback_dir: String,
    api_endpoint: String,

    tab: Tab,
    notifier: Notifier,

    gallery: GalleryState,
    /// Backend path of the selected image, kept across reloads
    selected: Option<String>,
    preview_uri: Option<String>,
    open_target: Option<String>,

    print_form: PrintForm,
    print_payload: String,
    print_result: String,
    print_in_flight: bool,
    last_print: Option<RefineResponse>,

    params: ParamForm,
    api_result: String,
    api_in_flight: bool,
}

impl Panel {
    pub fn new(config: &Config, host: Arc<dyn Host>, client: RefineClient, surface: Surface) -> Self {
        Self {
            resolver: PathResolver::new(host.clone(), &config.printer),
            host,
            client,
            fallback_dir: config.printer.fallback_dir.clone(),
            api_endpoint: config.service.endpoint.clone(),
            tab: Tab::default(),
            notifier: Notifier::new(surface),
            gallery: GalleryState::Empty,
            selected: None,
            preview_uri: None,
            open_target: None,
            print_form: PrintForm::new(&config.defaults, config.service.endpoint.clone()),
            print_payload: String::new(),
            print_result: String::new(),
            print_in_flight: false,
            last_print: None,
            params: ParamForm::with_defaults(),
            api_result: String::new(),
            api_in_flight: false,
        }
    }

    /// Drive an action and every follow-up task to completion
    pub async fn run(&mut self, action: Action) {
        let mut next = self.dispatch(action);
        while let Some(task) = next.take() {
            let event = task.await;
            next = self.apply(event);
        }
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Task> {
        debug!(?action, "Dispatch");
        match action {
            Action::LoadImages => {
                self.gallery = GalleryState::Loading;
                task(tasks::load_images(self.host.clone()))
            }
            Action::SelectImage(index) => self.select_image(index),
            Action::DeleteImage(index) => {
                let image = self.gallery.images().get(index)?;
                task(tasks::delete(self.host.clone(), image.backend_path.clone()))
            }
            Action::OpenFile => {
                let path = self.open_target.clone()?;
                task(tasks::open(self.host.clone(), path))
            }
            Action::SwitchTab(tab) => {
                info!(tab = tab.key(), "Switched tab");
                self.tab = tab;
                if tab == Tab::TestPrint {
                    self.dispatch(Action::LoadImages)
                } else {
                    None
                }
            }
            Action::AddParam => {
                self.params.add("", "");
                None
            }
            Action::RemoveParam(id) => {
                self.params.remove(id);
                None
            }
            Action::SubmitApi => self.submit_api(),
            Action::SendPrint => self.send_print(),
            Action::DismissNotification => {
                self.notifier.dismiss();
                None
            }
        }
    }

    fn select_image(&mut self, index: usize) -> Option<Task> {
        let image = self.gallery.images().get(index)?.clone();
        self.selected = Some(image.backend_path.clone());
        self.print_form.file_path = image.backend_path.clone();
        self.preview_uri = Some(image.display_path);
        self.open_target = None;

        task(tasks::copy_image(
            self.host.clone(),
            image.backend_path,
            self.fallback_dir.clone(),
        ))
    }

    fn submit_api(&mut self) -> Option<Task> {
        if self.api_in_flight {
            debug!("API request already in flight, ignoring");
            return None;
        }

        let params = self.params.collect();
        self.api_result = "Sending request...".to_string();
        self.api_in_flight = true;

        task(tasks::send_api(
            self.resolver.clone(),
            self.client.clone(),
            self.api_endpoint.clone(),
            params,
        ))
    }

    fn send_print(&mut self) -> Option<Task> {
        if self.print_in_flight {
            debug!("Print request already in flight, ignoring");
            return None;
        }

        self.print_result = "Preparing print job...".to_string();

        let request = match self.print_form.to_request(Local::now().naive_local()) {
            Ok(request) => request,
            Err(e) => {
                self.notifier.show(e.to_string(), NotificationKind::Error);
                self.print_result = "Error: No file selected".to_string();
                return None;
            }
        };

        self.notifier
            .show("Preparing image for printer access...", NotificationKind::Info);
        self.print_in_flight = true;

        task(tasks::prepare_print(self.resolver.clone(), request))
    }

    pub fn apply(&mut self, event: PanelEvent) -> Option<Task> {
        match event {
            PanelEvent::ImagesLoaded(Ok(images)) => {
                if let Some(selected) = &self.selected
                    && !images.iter().any(|image| &image.backend_path == selected)
                {
                    debug!(path = %selected, "Selected image no longer listed");
                    self.selected = None;
                }
                if let Some(first) = images.first()
                    && self.params.replace_placeholder_file(&first.backend_path)
                {
                    debug!(file = %first.backend_path, "API form now defaults to first image");
                }
                self.gallery = if images.is_empty() {
                    GalleryState::Empty
                } else {
                    GalleryState::Ready(images)
                };
                None
            }
            PanelEvent::ImagesLoaded(Err(e)) => {
                self.selected = None;
                self.gallery = GalleryState::Failed(e.clone());
                self.notifier
                    .show(format!("Error loading images: {e}"), NotificationKind::Error);
                None
            }
            PanelEvent::ImageCopied { source, result } => {
                self.image_copied(source, result);
                None
            }
            PanelEvent::ImageDeleted { path, result } => match result {
                Ok(()) => {
                    info!(path = %path, "Image deleted");
                    if self.selected.as_deref() == Some(path.as_str()) || self.print_form.file_path == path {
                        self.selected = None;
                        self.print_form.file_path.clear();
                        self.preview_uri = None;
                        self.open_target = None;
                    }
                    self.notifier
                        .show(format!("Deleted {path}"), NotificationKind::Success);
                    self.dispatch(Action::LoadImages)
                }
                Err(e) => {
                    self.notifier
                        .show(format!("Failed to delete image: {e}"), NotificationKind::Error);
                    None
                }
            },
            PanelEvent::FileOpened { path, result } => {
                match result {
                    Ok(()) => debug!(path = %path, "Opened file"),
                    Err(e) => self
                        .notifier
                        .show(format!("Failed to open file: {e}"), NotificationKind::Error),
                }
                None
            }
            PanelEvent::PrintPrepared { request, resolved } => {
                if !resolved.is_verified() {
                    warn!(file = %resolved.path, "Sending print job with an unverified file path");
                }
                self.print_payload = serde_json::to_string_pretty(&request).unwrap_or_default();
                self.notifier
                    .show("Sending print request...", NotificationKind::Success);
                task(tasks::send_print(
                    self.client.clone(),
                    self.print_endpoint(),
                    request,
                ))
            }
            PanelEvent::PrintFinished(result) => {
                self.print_in_flight = false;
                match result {
                    Ok(response) => {
                        self.print_result = serde_json::to_string_pretty(&response).unwrap_or_default();
                        if response.is_success() {
                            self.notifier.show(
                                format!("Print job sent successfully: {}", response.message),
                                NotificationKind::Success,
                            );
                        } else {
                            self.notifier.show(
                                format!("Print job failed: {}", response.message),
                                NotificationKind::Error,
                            );
                        }
                        self.last_print = Some(response);
                    }
                    Err(e) => {
                        self.print_result = format!("Error: {e}");
                        self.notifier.show(format!("Error: {e}"), NotificationKind::Error);
                    }
                }
                None
            }
            PanelEvent::ApiFinished { resolved, result } => {
                self.api_in_flight = false;
                if let Some(resolved) = resolved.filter(|r| !r.is_verified()) {
                    warn!(file = %resolved.path, "API request sent with an unverified file path");
                }
                match result {
                    Ok(response) => {
                        self.api_result = serde_json::to_string_pretty(&response).unwrap_or_default();
                        self.notifier
                            .show("API request successful", NotificationKind::Success);
                    }
                    Err(e) => {
                        self.api_result = format!("Error: {e}");
                        self.notifier.show(format!("Error: {e}"), NotificationKind::Error);
                    }
                }
                None
            }
        }
    }

    fn image_copied(&mut self, source: String, result: Result<CopyResult, String>) {
        let still_selected = self.selected.as_deref() == Some(source.as_str());
        if !still_selected {
            debug!(source = %source, "Dropping copy result for an image no longer selected");
            return;
        }

        match result {
            Ok(copy) => match copy.destination() {
                Some(destination) => {
                    self.notifier
                        .show(format!("File copied to {destination}"), NotificationKind::Success);
                    self.print_form.file_path = destination.to_string();
                    self.open_target = Some(destination.to_string());
                }
                None => self.notifier.show(
                    format!("Failed to copy file: {}", copy.message),
                    NotificationKind::Error,
                ),
            },
            Err(e) => self
                .notifier
                .show(format!("Failed to copy file: {e}"), NotificationKind::Error),
        }
    }

    fn print_endpoint(&self) -> String {
        match self.print_form.endpoint.trim() {
            "" => self.api_endpoint.clone(),
            endpoint => endpoint.to_string(),
        }
    }

    /// Advance timers (notification auto-hide)
    pub fn tick(&mut self, now: Instant) {
        self.notifier.tick(now);
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn gallery(&self) -> &GalleryState {
        &self.gallery
    }

    pub fn print_form_mut(&mut self) -> &mut PrintForm {
        &mut self.print_form
    }

    pub fn print_result(&self) -> &str {
        &self.print_result
    }

    pub fn api_result(&self) -> &str {
        &self.api_result
    }

    pub fn last_print(&self) -> Option<&RefineResponse> {
        self.last_print.as_ref()
    }

    pub fn params_mut(&mut self) -> &mut ParamForm {
        &mut self.params
    }

    pub fn print_tab(&mut self) -> PrintTab<'_> {
        PrintTab {
            form: &mut self.print_form,
            gallery: &self.gallery,
            selected: self.selected.as_deref().and_then(|path| {
                self.gallery
                    .images()
                    .iter()
                    .position(|image| image.backend_path == path)
            }),
            preview_uri: self.preview_uri.as_deref(),
            open_target: self.open_target.as_deref(),
            payload: &self.print_payload,
            result: &self.print_result,
            busy: self.print_in_flight,
        }
    }

    pub fn api_tab(&mut self) -> ApiTab<'_> {
        ApiTab {
            params: &mut self.params,
            endpoint: &self.api_endpoint,
            result: &self.api_result,
            busy: self.api_in_flight,
        }
    }
}
