//! Async work started by panel actions
//!
//! Each function owns what it needs and resolves to exactly one event. Host
//! calls are blocking filesystem work and run on the blocking pool.

use std::sync::Arc;

use super::PanelEvent;
use crate::client::{RefineClient, RequestKind};
use crate::host::{Host, HostError};
use crate::images::{copy_with_original_filename, delete_image, list_images};
use crate::job::PrintJobRequest;
use crate::params::ParamMap;
use crate::resolver::{PathResolver, ResolvedPath};

async fn blocking<T, F>(f: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| HostError::Task(e.to_string()).to_string())
}

async fn resolve(resolver: PathResolver, path: String) -> ResolvedPath {
    let fallback = resolver.clone();
    let source = path.clone();
    match blocking(move || resolver.resolve(&path)).await {
        Ok(resolved) => resolved,
        Err(reason) => fallback.fallback(&source, reason),
    }
}

pub(super) async fn load_images(host: Arc<dyn Host>) -> PanelEvent {
    let result = blocking(move || list_images(host.as_ref()).map_err(|e| e.to_string()))
        .await
        .and_then(|listed| listed);
    PanelEvent::ImagesLoaded(result)
}

pub(super) async fn copy_image(host: Arc<dyn Host>, source: String, fallback_dir: String) -> PanelEvent {
    let path = source.clone();
    let result = blocking(move || {
        copy_with_original_filename(host.as_ref(), &path, &fallback_dir).map_err(|e| e.to_string())
    })
    .await
    .and_then(|copied| copied);
    PanelEvent::ImageCopied { source, result }
}

pub(super) async fn delete(host: Arc<dyn Host>, path: String) -> PanelEvent {
    let target = path.clone();
    let result = blocking(move || delete_image(host.as_ref(), &target).map_err(|e| e.to_string()))
        .await
        .and_then(|deleted| deleted);
    PanelEvent::ImageDeleted { path, result }
}

pub(super) async fn open(host: Arc<dyn Host>, path: String) -> PanelEvent {
    let target = path.clone();
    let result = blocking(move || host.open_file(&target).map_err(|e| e.to_string()))
        .await
        .and_then(|opened| opened);
    PanelEvent::FileOpened { path, result }
}

pub(super) async fn prepare_print(resolver: PathResolver, mut request: PrintJobRequest) -> PanelEvent {
    let resolved = resolve(resolver, request.file.clone()).await;
    request.file = resolved.path.clone();
    PanelEvent::PrintPrepared { request, resolved }
}

pub(super) async fn send_print(client: RefineClient, endpoint: String, request: PrintJobRequest) -> PanelEvent {
    let result = client
        .submit(&endpoint, RequestKind::Print, &request)
        .await
        .map_err(|e| e.to_string());
    PanelEvent::PrintFinished(result)
}

pub(super) async fn send_api(
    resolver: PathResolver,
    client: RefineClient,
    endpoint: String,
    mut params: ParamMap,
) -> PanelEvent {
    let mut resolved = None;
    if let Some(file) = params.get("file").filter(|f| !f.trim().is_empty()).cloned() {
        let outcome = resolve(resolver, file).await;
        params.insert("file".to_string(), outcome.path.clone());
        resolved = Some(outcome);
    }

    let result = client
        .submit(&endpoint, RequestKind::Api, &params)
        .await
        .map_err(|e| e.to_string());
    PanelEvent::ApiFinished { resolved, result }
}
