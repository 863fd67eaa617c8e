//! Resolves the entry module's export into an application.

use std::fmt;
use std::sync::Arc;

use crate::app::{Application, Export};
use crate::config::AdapterConfig;
use crate::error::LoadError;
use crate::host::ModuleHost;

/// Loads the configured export of the entry module.
///
/// Nothing is cached here. Every call goes to the [`ModuleHost`], which
/// decides whether the module is evaluated again.
#[derive(Clone)]
pub struct ApplicationLoader {
    modules: Arc<dyn ModuleHost>,
    entry: String,
    export_name: String,
}

impl ApplicationLoader {
    pub fn new(
        modules: Arc<dyn ModuleHost>,
        entry: impl Into<String>,
        export_name: impl Into<String>,
    ) -> Self {
        Self {
            modules,
            entry: entry.into(),
            export_name: export_name.into(),
        }
    }

    pub fn from_config(modules: Arc<dyn ModuleHost>, config: &AdapterConfig) -> Self {
        Self::new(modules, config.entry.clone(), config.export_name.clone())
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn export_name(&self) -> &str {
        &self.export_name
    }

    /// Load the application.
    ///
    /// `Ok(None)` means the export exists but holds no application, which is
    /// not the same failure as a missing export.
    pub async fn load(&self) -> Result<Option<Application>, LoadError> {
        let namespace = self.modules.load_module(&self.entry).await?;

        let Some(export) = namespace.get(&self.export_name) else {
            tracing::error!(
                entry = %self.entry,
                export = %self.export_name,
                "Failed to find a named export {} from {}",
                self.export_name,
                self.entry
            );
            return Err(LoadError::ExportNotFound {
                export: self.export_name.clone(),
                entry: self.entry.clone(),
            });
        };

        match export {
            Export::Ready(app) => Ok(Some(app.clone())),
            Export::Empty => Ok(None),
            Export::Pending(pending) => Ok(pending.clone().await?),
        }
    }
}

impl fmt::Debug for ApplicationLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationLoader")
            .field("entry", &self.entry)
            .field("export_name", &self.export_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ModuleNamespace;
    use crate::error::ModuleError;
    use crate::module_graph::ModuleGraph;

    fn loader_for(namespace: ModuleNamespace) -> ApplicationLoader {
        let graph = ModuleGraph::new();
        graph.register("src/app.rs", move || {
            let namespace = namespace.clone();
            async move { Ok(namespace) }
        });
        ApplicationLoader::new(Arc::new(graph), "src/app.rs", "viteNodeApp")
    }

    #[tokio::test]
    async fn ready_export_is_returned() {
        let loader = loader_for(
            ModuleNamespace::new().with_export("viteNodeApp", Export::ready(Application::custom(5_i32))),
        );
        let app = loader.load().await.unwrap().unwrap();
        assert_eq!(app.downcast_ref::<i32>(), Some(&5));
    }

    #[tokio::test]
    async fn missing_export_fails_every_time() {
        let loader = loader_for(
            ModuleNamespace::new().with_export("default", Export::ready(Application::custom(()))),
        );

        for _ in 0..2 {
            let err = loader.load().await.unwrap_err();
            match err {
                LoadError::ExportNotFound { export, entry } => {
                    assert_eq!(export, "viteNodeApp");
                    assert_eq!(entry, "src/app.rs");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn pending_export_is_awaited() {
        let loader = loader_for(ModuleNamespace::new().with_export(
            "viteNodeApp",
            Export::pending(async {
                tokio::task::yield_now().await;
                Ok(Some(Application::custom(String::from("ready"))))
            }),
        ));

        let app = loader.load().await.unwrap().unwrap();
        assert_eq!(app.downcast_ref::<String>().map(String::as_str), Some("ready"));
    }

    #[tokio::test]
    async fn empty_values_stay_empty() {
        let loader = loader_for(ModuleNamespace::new().with_export("viteNodeApp", Export::Empty));
        assert!(loader.load().await.unwrap().is_none());

        let loader = loader_for(
            ModuleNamespace::new().with_export("viteNodeApp", Export::pending(async { Ok(None) })),
        );
        assert!(loader.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn module_errors_propagate_unchanged() {
        let graph = ModuleGraph::new();
        graph.register("src/app.rs", || async {
            Err(ModuleError::evaluation("src/app.rs", "syntax error"))
        });
        let loader = ApplicationLoader::new(Arc::new(graph), "src/app.rs", "viteNodeApp");

        let err = loader.load().await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::Module(ModuleError::Evaluation { message, .. }) if message == "syntax error"
        ));
    }
}
