//! Integration tests for the WebSocket client connection.
//!
//! A throwaway gateway is started on a random local port with plain
//! `tokio-tungstenite`, and the client connection talks to it.

#[cfg(feature = "websocket")]
mod websocket {
    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpListener;
    use tokio_tungstenite::tungstenite::Message;
    use tyche_transport::{Connection, TransportError, WebSocketConnection};

    type ServerWs = tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>;

    /// Binds a listener and returns its URL plus a task resolving to the
    /// accepted server-side stream.
    async fn gateway() -> (String, tokio::task::JoinHandle<ServerWs>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        let handle = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("should accept");
            tokio_tungstenite::accept_async(stream)
                .await
                .expect("handshake should succeed")
        });
        (format!("ws://{addr}"), handle)
    }

    #[tokio::test]
    async fn test_connect_send_and_receive() {
        let (url, handle) = gateway().await;
        let conn = WebSocketConnection::connect(&url)
            .await
            .expect("client should connect");
        let mut server = handle.await.expect("task should complete");

        assert!(conn.id().into_inner() > 0);

        conn.send(br#"{"type":"Auth"}"#).await.expect("send");
        let msg = server.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), br#"{"type":"Auth"}"#);

        server
            .send(Message::Text("hello bot".into()))
            .await
            .unwrap();
        let received = conn
            .recv()
            .await
            .expect("recv should succeed")
            .expect("should have data");
        assert_eq!(received, b"hello bot");

        conn.close().await.expect("close should succeed");
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_gateway_closes() {
        let (url, handle) = gateway().await;
        let conn = WebSocketConnection::connect(&url).await.unwrap();
        let mut server = handle.await.unwrap();

        server.send(Message::Close(None)).await.unwrap();

        let result = conn.recv().await.expect("recv should not error");
        assert!(result.is_none(), "should return None on close");
    }

    #[tokio::test]
    async fn test_connect_to_nothing_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = WebSocketConnection::connect(&format!("ws://{addr}")).await;
        assert!(matches!(result, Err(TransportError::ConnectFailed(_))));
    }
}
