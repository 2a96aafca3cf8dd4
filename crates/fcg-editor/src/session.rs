// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Import, export and validate: the operations that cross into the host.
//!
//! Each one ends in exactly one notification, except a cancelled dialog
//! which ends silently. A failed or cancelled request never changes the
//! live document.

use crate::{
    ConfigHost, DocumentEditor, EditorError, HostError, HostValidation, Notification, Notifier,
    Patch, PatchOutcome, SessionError,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

pub struct Session<H> {
    editor: DocumentEditor,
    host: Arc<H>,
    notifier: Notifier,
}

impl<H: ConfigHost + 'static> Session<H> {
    /// Create a session and the receiving end of its notification channel.
    pub fn new(host: H) -> (Self, UnboundedReceiver<Notification>) {
        let (notifier, rx) = Notifier::channel();
        (Self::with_notifier(Arc::new(host), notifier), rx)
    }

    pub fn with_notifier(host: Arc<H>, notifier: Notifier) -> Self {
        Self {
            editor: DocumentEditor::new(),
            host,
            notifier,
        }
    }

    pub fn editor(&self) -> &DocumentEditor {
        &self.editor
    }

    pub fn start_new(&mut self) {
        self.editor.start_new();
    }

    pub fn apply(&mut self, patch: Patch) -> Result<PatchOutcome, EditorError> {
        self.editor.apply(patch)
    }

    /// Ask the host for a document, parse it and adopt it.
    pub async fn import(&mut self) -> Result<(), SessionError> {
        let result = match self.host.import_config().await {
            Ok(raw) => fcg_schema::parse(&raw).map_err(SessionError::from),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(doc) => {
                tracing::info!(cameras = doc.cameras.len(), "imported configuration");
                self.editor.load(doc);
                self.notifier
                    .send(Notification::success("Configuration imported successfully"));
                Ok(())
            }
            // A closed dialog is a rejection the caller sees, never a notification.
            Err(SessionError::Cancelled) => {
                tracing::debug!("import cancelled");
                Err(SessionError::Cancelled)
            }
            Err(e) => {
                self.notifier.send(Notification::error(format!(
                    "Failed to import configuration: {e}"
                )));
                Err(e)
            }
        }
    }

    /// Export the defaulted current snapshot. Validation errors do not block
    /// export.
    pub async fn export(&mut self) -> Result<(), SessionError> {
        let Some(snapshot) = self.editor.snapshot() else {
            self.notifier
                .send(Notification::error("No configuration to export"));
            return Err(EditorError::NoDocument.into());
        };
        let doc = fcg_schema::apply_defaults(&snapshot);

        match self.host.export_config(&doc).await {
            Ok(true) => {
                self.editor.mark_exported()?;
                tracing::info!("exported configuration");
                self.notifier
                    .send(Notification::success("Configuration exported successfully"));
                Ok(())
            }
            // A closed dialog is a rejection the caller sees, never a notification.
            Ok(false) | Err(HostError::Cancelled) => {
                tracing::debug!("export cancelled");
                Err(SessionError::Cancelled)
            }
            Err(e) => {
                self.notifier.send(Notification::error(format!(
                    "Failed to export configuration: {e}"
                )));
                Err(e.into())
            }
        }
    }

    /// Validate the snapshot current at call time.
    ///
    /// The returned future owns everything it needs, so editing can go on
    /// while it runs; later edits are not seen by it.
    pub fn validate(
        &self,
    ) -> impl Future<Output = Result<HostValidation, SessionError>> + Send + 'static {
        let snapshot = self.editor.snapshot();
        let host = Arc::clone(&self.host);
        let notifier = self.notifier.clone();

        async move {
            let Some(doc) = snapshot else {
                notifier.send(Notification::error("No configuration to validate"));
                return Err(EditorError::NoDocument.into());
            };

            match host.validate_config(&doc).await {
                Ok(result) => {
                    if result.valid {
                        notifier.send(Notification::success("Configuration is valid"));
                    } else {
                        let error = result.error.as_deref().unwrap_or("unspecified error");
                        notifier.send(Notification::error(format!(
                            "Invalid configuration: {error}"
                        )));
                    }
                    Ok(result)
                }
                Err(HostError::Cancelled) => {
                    tracing::debug!("validation cancelled");
                    Err(SessionError::Cancelled)
                }
                Err(e) => {
                    notifier.send(Notification::error(format!("Validation error: {e}")));
                    Err(e.into())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockConfigHost;
    use crate::{CameraField, EditorState, Severity};
    use fcg_config_types::ConfigDocument;
    use serde_json::json;

    fn front_camera_json() -> serde_json::Value {
        json!({
            "cameras": {
                "front": {"ffmpeg": {"inputs": [{"path": "rtsp://x", "roles": ["detect"]}]}}
            }
        })
    }

    #[tokio::test]
    async fn test_import_adopts_parsed_document() {
        let mut host = MockConfigHost::new();
        host.expect_import_config()
            .times(1)
            .returning(|| Ok(front_camera_json()));

        let (mut session, mut rx) = Session::new(host);
        session.import().await.unwrap();

        assert_eq!(session.editor().state(), EditorState::Loaded);
        assert!(session.editor().snapshot().unwrap().cameras.contains_key("front"));
        assert_eq!(
            rx.recv().await.unwrap(),
            Notification::success("Configuration imported successfully")
        );
    }

    #[tokio::test]
    async fn test_failed_import_keeps_document() {
        let mut host = MockConfigHost::new();
        host.expect_import_config()
            .returning(|| Ok(json!({"cameras": {}, "mqtt": {"host": "h", "port": "1883"}})));

        let (mut session, mut rx) = Session::new(host);
        session.start_new();
        session.apply(Patch::add_camera("front")).unwrap();
        let before = session.editor().snapshot().unwrap();

        let err = session.import().await.unwrap_err();
        assert!(matches!(err, SessionError::Parse(_)));
        assert!(Arc::ptr_eq(&before, &session.editor().snapshot().unwrap()));
        assert_eq!(session.editor().state(), EditorState::Edited);

        let note = rx.recv().await.unwrap();
        assert_eq!(note.severity, Severity::Error);
        assert!(note.message.starts_with("Failed to import configuration: "));
        assert!(note.message.contains("mqtt.port"), "{}", note.message);
    }

    #[tokio::test]
    async fn test_cancelled_import_is_silent() {
        let mut host = MockConfigHost::new();
        host.expect_import_config()
            .returning(|| Err(HostError::Cancelled));

        let (mut session, mut rx) = Session::new(host);
        assert!(matches!(
            session.import().await,
            Err(SessionError::Cancelled)
        ));
        assert_eq!(session.editor().state(), EditorState::Empty);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_export_without_document() {
        let host = MockConfigHost::new();
        let (mut session, mut rx) = Session::new(host);
        assert!(session.export().await.is_err());
        assert_eq!(
            rx.recv().await.unwrap(),
            Notification::error("No configuration to export")
        );
    }

    #[tokio::test]
    async fn test_export_sends_defaulted_document() {
        let mut host = MockConfigHost::new();
        host.expect_export_config()
            .withf(|doc: &ConfigDocument| {
                let record = doc.cameras.get("front").and_then(|c| c.record.as_ref());
                record.is_some_and(|r| r.enabled == Some(false))
            })
            .times(1)
            .returning(|_| Ok(true));

        let (mut session, mut rx) = Session::new(host);
        session.start_new();
        session.apply(Patch::add_camera("front")).unwrap();
        session
            .apply(Patch::set_camera_field("front", CameraField::RetainDays(Some(3))))
            .unwrap();

        session.export().await.unwrap();
        assert_eq!(session.editor().state(), EditorState::Exported);
        assert_eq!(
            rx.recv().await.unwrap(),
            Notification::success("Configuration exported successfully")
        );
        // The live document itself is not defaulted
        let live = session.editor().snapshot().unwrap();
        assert_eq!(live.cameras.get("front").unwrap().record.as_ref().unwrap().enabled, None);
    }

    #[tokio::test]
    async fn test_export_failure_and_cancel() {
        let mut host = MockConfigHost::new();
        let mut calls = 0;
        host.expect_export_config().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(false)
            } else {
                Err(HostError::Rejected("disk full".into()))
            }
        });

        let (mut session, mut rx) = Session::new(host);
        session.start_new();

        assert!(matches!(session.export().await, Err(SessionError::Cancelled)));
        assert!(rx.try_recv().is_err());

        assert!(matches!(session.export().await, Err(SessionError::Host(_))));
        assert_eq!(
            rx.recv().await.unwrap(),
            Notification::error("Failed to export configuration: disk full")
        );
        assert_eq!(session.editor().state(), EditorState::Loaded);
    }

    #[tokio::test]
    async fn test_validate_uses_snapshot_at_call_time() {
        let mut host = MockConfigHost::new();
        host.expect_validate_config()
            .returning(|doc| Ok(fcg_schema::validate(doc).into()));

        let (mut session, mut rx) = Session::new(host);
        session.start_new();
        session.apply(Patch::add_camera("front")).unwrap();

        let pending = session.validate();
        session
            .apply(Patch::set_camera_field("front", CameraField::SnapshotsQuality(Some(150))))
            .unwrap();

        let result = pending.await.unwrap();
        assert!(result.valid);
        assert_eq!(rx.recv().await.unwrap(), Notification::success("Configuration is valid"));

        let result = session.validate().await.unwrap();
        assert!(!result.valid);
        let note = rx.recv().await.unwrap();
        assert_eq!(
            note.message,
            "Invalid configuration: cameras.front.snapshots.quality: must be between 1 and 100 (got 150)"
        );
    }

    #[tokio::test]
    async fn test_validate_host_failure() {
        let mut host = MockConfigHost::new();
        host.expect_validate_config()
            .returning(|_| Err(HostError::Rejected("backend unreachable".into())));

        let (mut session, mut rx) = Session::new(host);
        assert!(session.validate().await.is_err());
        assert_eq!(
            rx.recv().await.unwrap(),
            Notification::error("No configuration to validate")
        );

        session.start_new();
        assert!(session.validate().await.is_err());
        assert_eq!(
            rx.recv().await.unwrap(),
            Notification::error("Validation error: backend unreachable")
        );
    }
}
