use std::collections::HashMap;

use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Channel sender half for pushing frames to one WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Process-local registry of live chat connections.
///
/// Holds the user-id -> socket-id map and its reverse, plus the outbound
/// channel per socket. State is lost on restart and is not shared across
/// server instances; history lives in the messages table.
pub struct ChatGateway {
    user_sockets: RwLock<HashMap<Uuid, String>>,
    socket_users: RwLock<HashMap<String, Uuid>>,
    senders: RwLock<HashMap<String, WsSender>>,
}

impl ChatGateway {
    pub fn new() -> Self {
        Self {
            user_sockets: RwLock::new(HashMap::new()),
            socket_users: RwLock::new(HashMap::new()),
            senders: RwLock::new(HashMap::new()),
        }
    }

    /// Register an authenticated connection. Returns the receiver half the
    /// socket task forwards to the sink. A reconnect replaces the previous
    /// socket for that user.
    pub async fn register(
        &self,
        socket_id: String,
        user_id: Uuid,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();

        // Locks are taken one at a time, never nested.
        let old_socket = self
            .user_sockets
            .write()
            .await
            .insert(user_id, socket_id.clone());
        if let Some(old_socket) = old_socket {
            self.socket_users.write().await.remove(&old_socket);
            self.senders.write().await.remove(&old_socket);
        }
        self.socket_users
            .write()
            .await
            .insert(socket_id.clone(), user_id);
        self.senders.write().await.insert(socket_id, tx);

        rx
    }

    pub async fn unregister(&self, socket_id: &str) {
        let user_id = self.socket_users.write().await.remove(socket_id);
        if let Some(user_id) = user_id {
            // Only drop the forward mapping if it still points at this socket;
            // a reconnect may already have replaced it.
            let mut user_sockets = self.user_sockets.write().await;
            if user_sockets.get(&user_id).map(|s| s.as_str()) == Some(socket_id) {
                user_sockets.remove(&user_id);
            }
        }
        self.senders.write().await.remove(socket_id);
    }

    pub async fn user_for_socket(&self, socket_id: &str) -> Option<Uuid> {
        self.socket_users.read().await.get(socket_id).copied()
    }

    pub async fn is_online(&self, user_id: Uuid) -> bool {
        self.user_sockets.read().await.contains_key(&user_id)
    }

    pub async fn connection_count(&self) -> usize {
        self.senders.read().await.len()
    }

    /// Deliver a frame to the user's socket if one is registered.
    /// Returns false when the user is offline or the channel is closed.
    pub async fn send_to_user(&self, user_id: Uuid, message: Message) -> bool {
        let socket_id = match self.user_sockets.read().await.get(&user_id) {
            Some(id) => id.clone(),
            None => return false,
        };

        match self.senders.read().await.get(&socket_id) {
            Some(sender) => sender.send(message).is_ok(),
            None => false,
        }
    }

    /// Serialize a JSON event and deliver it to the user's socket.
    pub async fn emit_to_user(&self, user_id: Uuid, payload: &serde_json::Value) -> bool {
        self.send_to_user(user_id, Message::Text(payload.to_string()))
            .await
    }
}

impl Default for ChatGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_gateway_has_zero_connections() {
        let gateway = ChatGateway::new();

        assert_eq!(gateway.connection_count().await, 0);
    }

    #[tokio::test]
    async fn register_tracks_both_directions() {
        let gateway = ChatGateway::new();
        let user_id = Uuid::new_v4();

        let _rx = gateway.register("socket-1".to_string(), user_id).await;

        assert!(gateway.is_online(user_id).await);
        assert_eq!(gateway.user_for_socket("socket-1").await, Some(user_id));
        assert_eq!(gateway.connection_count().await, 1);
    }

    #[tokio::test]
    async fn unregister_clears_both_maps() {
        let gateway = ChatGateway::new();
        let user_id = Uuid::new_v4();

        let _rx = gateway.register("socket-1".to_string(), user_id).await;
        gateway.unregister("socket-1").await;

        assert!(!gateway.is_online(user_id).await);
        assert_eq!(gateway.user_for_socket("socket-1").await, None);
        assert_eq!(gateway.connection_count().await, 0);
    }

    #[tokio::test]
    async fn reconnect_replaces_previous_socket() {
        let gateway = ChatGateway::new();
        let user_id = Uuid::new_v4();

        let _rx1 = gateway.register("socket-1".to_string(), user_id).await;
        let _rx2 = gateway.register("socket-2".to_string(), user_id).await;

        assert_eq!(gateway.user_for_socket("socket-1").await, None);
        assert_eq!(gateway.user_for_socket("socket-2").await, Some(user_id));
        assert_eq!(gateway.connection_count().await, 1);
    }

    #[tokio::test]
    async fn unregister_of_stale_socket_keeps_new_connection() {
        let gateway = ChatGateway::new();
        let user_id = Uuid::new_v4();

        let _rx1 = gateway.register("socket-1".to_string(), user_id).await;
        let _rx2 = gateway.register("socket-2".to_string(), user_id).await;

        // The old connection's cleanup must not knock the user offline.
        gateway.unregister("socket-1").await;

        assert!(gateway.is_online(user_id).await);
        assert_eq!(gateway.user_for_socket("socket-2").await, Some(user_id));
    }

    #[tokio::test]
    async fn send_to_offline_user_returns_false() {
        let gateway = ChatGateway::new();

        let delivered = gateway
            .send_to_user(Uuid::new_v4(), Message::Text("hello".to_string()))
            .await;

        assert!(!delivered);
    }

    #[tokio::test]
    async fn send_to_online_user_delivers_frame() {
        let gateway = ChatGateway::new();
        let user_id = Uuid::new_v4();

        let mut rx = gateway.register("socket-1".to_string(), user_id).await;

        let delivered = gateway
            .send_to_user(user_id, Message::Text("hello".to_string()))
            .await;
        assert!(delivered);

        match rx.recv().await.unwrap() {
            Message::Text(text) => assert_eq!(text, "hello"),
            other => panic!("expected text frame, got {:?}", other),
        }
    }
}
