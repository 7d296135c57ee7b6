use fuxi_mount::volume::config::ClientConfig;
use fuxi_mount::volume::host::StaticHost;
use fuxi_mount::volume::rpc::{Endpoint, Scheme};
use fuxi_mount::volume::{
    Client, MountId, ServiceBinder, TransportError, VolumeError, VolumeName, VolumeOptions,
    VolumePlugin, VolumeService, api::RpcMethod,
};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
struct Received {
    method: String,
    content_type: Option<String>,
    body: Value,
}

/// Scripted plugin endpoint. Each method answers from its queue of raw
/// bodies; the last body is repeated once the queue runs dry. Unknown methods
/// get a plain-text 404.
struct MockPlugin {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<Received>>>,
}

impl MockPlugin {
    async fn start(script: Vec<(&str, &str)>) -> Self {
        let mut routes: HashMap<String, VecDeque<String>> = HashMap::new();
        for (method, body) in script {
            routes
                .entry(method.to_string())
                .or_default()
                .push_back(body.to_string());
        }
        let routes = Arc::new(Mutex::new(routes));
        let received = Arc::new(Mutex::new(Vec::new()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let log = received.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let svc = service_fn(move |req: Request<Incoming>| {
                        let routes = routes.clone();
                        let log = log.clone();
                        async move { Ok::<_, Infallible>(respond(req, &routes, &log).await) }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), svc)
                        .await;
                });
            }
        });

        Self { addr, received }
    }

    fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }

    fn methods(&self) -> Vec<String> {
        self.received().into_iter().map(|r| r.method).collect()
    }

    fn client(&self) -> Client {
        let endpoint = Endpoint::new(Scheme::Http, self.addr).unwrap();
        Client::connect(endpoint, Some(Duration::from_secs(5))).unwrap()
    }

    fn plugin(&self) -> VolumePlugin {
        let config = ClientConfig {
            host: "127.0.0.1".into(),
            port: self.addr.port(),
            scheme: Scheme::Http,
            timeout: Some(Duration::from_secs(5)),
        };
        let host = Arc::new(StaticHost(self.addr.ip()));
        VolumePlugin::new(Arc::new(ServiceBinder::new(config, host)))
    }
}

async fn respond(
    req: Request<Incoming>,
    routes: &Mutex<HashMap<String, VecDeque<String>>>,
    log: &Mutex<Vec<Received>>,
) -> Response<Full<Bytes>> {
    let method = req.uri().path().trim_start_matches('/').to_string();
    let content_type = req
        .headers()
        .get(hyper::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = req.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    log.lock().unwrap().push(Received {
        method: method.clone(),
        content_type,
        body,
    });

    let reply = {
        let mut routes = routes.lock().unwrap();
        routes.get_mut(&method).and_then(|queue| {
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        })
    };

    match reply {
        Some(body) => Response::new(Full::new(Bytes::from(body))),
        None => {
            let mut resp = Response::new(Full::new(Bytes::from_static(b"404 page not found")));
            *resp.status_mut() = StatusCode::NOT_FOUND;
            resp
        }
    }
}

fn name(s: &str) -> VolumeName {
    VolumeName::new(s).unwrap()
}

#[tokio::test]
async fn test_create_and_mount_over_http() {
    let mock = MockPlugin::start(vec![
        ("VolumeDriver.Get", r#"{"Volume":null,"Err":"Volume Not Found"}"#),
        (
            "VolumeDriver.Get",
            r#"{"Volume":{"Name":"vol1","Mountpoint":"","Status":null},"Err":""}"#,
        ),
        ("VolumeDriver.Create", r#"{"Err":""}"#),
        ("VolumeDriver.Mount", r#"{"Mountpoint":"/mnt/vol1","Err":""}"#),
    ])
    .await;

    let mut mounter = mock.plugin().mounter(name("vol1"), None, false);
    let path = mounter.set_up().await.unwrap();
    assert_eq!(path, "/mnt/vol1");

    assert_eq!(
        mock.methods(),
        vec![
            "VolumeDriver.Get",
            "VolumeDriver.Create",
            "VolumeDriver.Get",
            "VolumeDriver.Mount",
        ]
    );

    let received = mock.received();
    assert_eq!(received[0].body, json!({"Name": "vol1"}));
    // A missing option set goes over the wire as an empty object, never null.
    assert_eq!(received[1].body, json!({"Name": "vol1", "Opts": {}}));
    assert_eq!(received[3].body, json!({"Name": "vol1", "ID": ""}));
    for r in &received {
        assert_eq!(r.content_type.as_deref(), Some("application/json"));
    }
}

#[tokio::test]
async fn test_mounted_volume_needs_single_round_trip() {
    let mock = MockPlugin::start(vec![(
        "VolumeDriver.Get",
        r#"{"Volume":{"Name":"vol2","Mountpoint":"/mnt/vol2"},"Err":""}"#,
    )])
    .await;

    let path = mock
        .plugin()
        .mounter(name("vol2"), None, false)
        .set_up()
        .await
        .unwrap();

    assert_eq!(path, "/mnt/vol2");
    assert_eq!(mock.methods(), vec!["VolumeDriver.Get"]);
}

#[tokio::test]
async fn test_service_error_stops_before_create() {
    let mock = MockPlugin::start(vec![(
        "VolumeDriver.Get",
        r#"{"Volume":{},"Err":"keystone unauthorized"}"#,
    )])
    .await;

    let err = mock
        .plugin()
        .mounter(name("vol1"), None, false)
        .set_up()
        .await
        .unwrap_err();

    assert!(matches!(&err, VolumeError::Service(m) if m == "keystone unauthorized"));
    assert_eq!(mock.methods(), vec!["VolumeDriver.Get"]);
}

#[tokio::test]
async fn test_activate_sends_empty_document() {
    let mock = MockPlugin::start(vec![("Plugin.Activate", r#"{"Implements":["VolumeDriver"]}"#)])
        .await;

    let implements = mock.client().activate().await.unwrap();

    assert_eq!(implements, vec!["VolumeDriver".to_string()]);
    assert_eq!(mock.received()[0].body, json!({}));
}

#[tokio::test]
async fn test_list_get_capabilities_and_remove() {
    let mock = MockPlugin::start(vec![
        (
            "VolumeDriver.List",
            r#"{"Volumes":[{"Name":"a","Mountpoint":"/mnt/a"},{"Name":"b"}],"Err":""}"#,
        ),
        ("VolumeDriver.Capabilities", r#"{"Capabilities":{"Scope":"global"}}"#),
        ("VolumeDriver.Remove", r#"{"Err":""}"#),
        (
            "VolumeDriver.Get",
            r#"{"Volume":{"Name":"a","Mountpoint":"/mnt/a","Status":{"size":1}},"Err":""}"#,
        ),
    ])
    .await;
    let client = mock.client();

    let volumes = client.list().await.unwrap();
    assert_eq!(volumes.len(), 2);
    assert_eq!(volumes[0].mountpoint, "/mnt/a");
    assert!(!volumes[1].is_mounted());

    assert_eq!(client.capabilities().await.unwrap().scope, "global");

    client.remove(&name("a")).await.unwrap();
    assert_eq!(mock.received()[2].body, json!({"Name": "a"}));

    assert_eq!(client.path(&name("a")).await.unwrap(), "/mnt/a");
    let vol = client.get(&name("a")).await.unwrap();
    assert_eq!(vol.status["size"], json!(1));
}

#[tokio::test]
async fn test_create_forwards_options() {
    let mock = MockPlugin::start(vec![("VolumeDriver.Create", r#"{"Err":""}"#)]).await;
    let opts = VolumeOptions::from([("size".to_string(), "10".to_string())]);

    mock.client().create(&name("vol1"), &opts).await.unwrap();

    assert_eq!(
        mock.received()[0].body,
        json!({"Name": "vol1", "Opts": {"size": "10"}})
    );
}

#[tokio::test]
async fn test_mount_error_is_reported() {
    let mock = MockPlugin::start(vec![(
        "VolumeDriver.Mount",
        r#"{"Mountpoint":"","Err":"device busy"}"#,
    )])
    .await;

    let err = mock
        .client()
        .mount(&name("vol1"), &MountId::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "device busy");
}

#[tokio::test]
async fn test_unknown_route_is_status_error() {
    let mock = MockPlugin::start(vec![]).await;

    let err = mock.client().list().await.unwrap_err();

    match err {
        VolumeError::Transport(TransportError::Status {
            method,
            status,
            body,
        }) => {
            assert_eq!(method, RpcMethod::List);
            assert_eq!(status.as_u16(), 404);
            assert_eq!(body, "404 page not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mock = MockPlugin::start(vec![("VolumeDriver.Get", "<html>oops</html>")]).await;

    let err = mock.client().get(&name("vol1")).await.unwrap_err();

    assert!(matches!(
        err,
        VolumeError::Transport(TransportError::Decode {
            method: RpcMethod::Get,
            ..
        })
    ));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = Endpoint::new(Scheme::Http, addr).unwrap();
    let client = Client::connect(endpoint, Some(Duration::from_secs(5))).unwrap();
    let err = client.activate().await.unwrap_err();

    assert!(matches!(
        err,
        VolumeError::Transport(TransportError::Request { .. })
    ));
}

#[tokio::test]
async fn test_path_is_empty_when_service_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = ClientConfig {
        port,
        timeout: Some(Duration::from_secs(5)),
        ..ClientConfig::default()
    };
    let host = Arc::new(StaticHost(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    let plugin = VolumePlugin::new(Arc::new(ServiceBinder::new(config, host)));

    assert_eq!(plugin.unmounter(name("vol1")).path().await, "");
    assert!(plugin.unmounter(name("vol1")).tear_down().await.is_ok());
}
