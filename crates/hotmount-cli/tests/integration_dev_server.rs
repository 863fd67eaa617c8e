//! End-to-end tests of the dev server: a real listener, the request bridge,
//! and restarts driven by the hot-reload coordinator.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use hotmount::{
    AdapterConfig, Application, Export, HotReloadCoordinator, HotUpdate, ModuleGraph,
    ModuleNamespace, MountPlugin, RestartError,
};
use hotmount_cli::dev::{DevServerState, Supervisor, SupervisorCommand};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Register an app whose response names the evaluation that produced it.
fn counting_modules() -> (Arc<ModuleGraph>, Arc<AtomicUsize>) {
    let evaluations = Arc::new(AtomicUsize::new(0));
    let modules = ModuleGraph::new();
    let counter = evaluations.clone();
    modules.register("src/app.rs", move || {
        let generation = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            let router = Router::new().route(
                "/",
                get(move || async move { format!("generation {generation}") }),
            );
            Ok(ModuleNamespace::new()
                .with_export("viteNodeApp", Export::ready(Application::Router(router))))
        }
    });
    (Arc::new(modules), evaluations)
}

fn supervisor(
    modules: Arc<ModuleGraph>,
    config: AdapterConfig,
) -> (Supervisor, tokio::sync::mpsc::Receiver<SupervisorCommand>) {
    Supervisor::new(
        MountPlugin::new(config),
        modules,
        Arc::new(DevServerState::new("/__hotmount/events")),
        ([127, 0, 0, 1], 0).into(),
    )
}

async fn start(supervisor: &mut Supervisor) -> Option<SocketAddr> {
    match supervisor.start().await {
        Ok(addr) => Some(addr),
        Err(err) => {
            eprintln!("Skipping test: unable to start server ({err})");
            None
        }
    }
}

/// Minimal HTTP/1.1 GET returning the status line and body.
async fn get_text(addr: SocketAddr, path: &str) -> (String, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut raw = String::new();
    stream.read_to_string(&mut raw).await.unwrap();

    let status = raw.lines().next().unwrap_or_default().to_string();
    let body = raw
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}

#[tokio::test]
async fn test_serves_application_through_bridge() {
    let (modules, _) = counting_modules();
    let (mut supervisor, _commands) = supervisor(modules, AdapterConfig::new("src/app.rs", "axum"));
    let Some(addr) = start(&mut supervisor).await else {
        return;
    };

    let (status, body) = get_text(addr, "/").await;
    assert!(status.contains("200"), "unexpected status: {status}");
    assert!(body.contains("generation 1"));

    let (status, _) = get_text(addr, "/missing").await;
    assert!(status.contains("404"), "unexpected status: {status}");

    supervisor.stop().await.unwrap();
    assert!(!supervisor.is_running());
}

#[tokio::test]
async fn test_restart_evaluates_modules_again_on_same_port() {
    let (modules, evaluations) = counting_modules();
    let (mut supervisor, _commands) = supervisor(modules, AdapterConfig::new("src/app.rs", "axum"));
    let Some(addr) = start(&mut supervisor).await else {
        return;
    };

    let (_, body) = get_text(addr, "/").await;
    assert!(body.contains("generation 1"));

    let restarted = supervisor.restart().await.unwrap();
    assert_eq!(restarted, addr);

    let (_, body) = get_text(addr, "/").await;
    assert!(body.contains("generation 2"));
    assert_eq!(evaluations.load(Ordering::SeqCst), 2);

    supervisor.stop().await.unwrap();
}

#[tokio::test]
async fn test_file_change_restarts_through_coordinator() {
    let (modules, evaluations) = counting_modules();
    let (mut supervisor, mut commands) =
        supervisor(modules, AdapterConfig::new("src/app.rs", "axum"));
    let Some(addr) = start(&mut supervisor).await else {
        return;
    };

    let handle = supervisor.handle();
    let (_, mut client) = handle.state().register_client();
    let coordinator = HotReloadCoordinator::new(Arc::new(handle));

    let (_, body) = get_text(addr, "/").await;
    assert!(body.contains("generation 1"));

    coordinator.handle_hot_update(HotUpdate::new(vec!["src/app.rs".into()]));

    // The dev loop's side of the restart request
    let command = tokio::time::timeout(Duration::from_secs(5), commands.recv())
        .await
        .unwrap()
        .unwrap();
    let SupervisorCommand::Restart(reply) = command;
    let outcome = supervisor
        .restart()
        .await
        .map(|_| ())
        .map_err(|e| RestartError::Failed(e.to_string()));
    reply.send(outcome).unwrap();
    coordinator.wait_idle().await;

    assert_eq!(
        client.recv().await.as_deref(),
        Some(r#"{"type":"full-reload","path":"*"}"#)
    );
    // Clients are disconnected when the server goes down
    assert!(client.recv().await.is_none());

    let (_, body) = get_text(addr, "/").await;
    assert!(body.contains("generation 2"));
    assert_eq!(evaluations.load(Ordering::SeqCst), 2);

    supervisor.stop().await.unwrap();
}

#[tokio::test]
async fn test_init_on_boot_loads_before_first_request() {
    let (modules, evaluations) = counting_modules();
    let (mut supervisor, _commands) = supervisor(
        modules,
        AdapterConfig::new("src/app.rs", "axum").with_init_on_boot(true),
    );
    if start(&mut supervisor).await.is_none() {
        return;
    }

    tokio::time::timeout(Duration::from_secs(5), async {
        while evaluations.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    supervisor.stop().await.unwrap();
}
