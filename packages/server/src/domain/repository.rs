//! Repository trait 定義
//!
//! ドメイン層が必要とする共有状態へのインターフェースを定義します。
//! 具体的な実装（ロックの取り方を含む）は Infrastructure 層が提供します。
//!
//! ## ロック順序
//!
//! 両方のリポジトリに触れる処理は必ず `RoomRepository` → `HeartbeatRepository`
//! の順に、入れ子にせず逐次に呼び出すこと。

use async_trait::async_trait;

use super::{
    entity::{Room, SystemNotice},
    value_object::{ClientName, MailboxAddress, RoomName, Timestamp},
};

/// Room Registry へのアクセス
///
/// 変更系（register / join / leave / quit）は排他、参照系は共有アクセス。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 登録済みメールボックスに追加（既に登録済みなら `false`）
    async fn register(&self, address: MailboxAddress) -> bool;

    /// 全ルームから外した上で `room` に参加させる
    async fn join(&self, client: ClientName, room: RoomName) -> SystemNotice;

    /// 在室中のルームから退出させる
    async fn leave(&self, client: &ClientName) -> Option<SystemNotice>;

    /// 退出 + 登録解除
    async fn quit(&self, client: &ClientName) -> Option<SystemNotice>;

    /// メンバー一覧（存在しない・空のルームは空）
    async fn who(&self, room: &RoomName) -> Vec<ClientName>;

    /// 配信先解決用のメンバー一覧
    async fn members_of(&self, room: &RoomName) -> Option<Vec<ClientName>>;

    /// クライアントが在室しているルーム
    async fn room_of(&self, client: &ClientName) -> Option<RoomName>;

    /// 登録済みクライアントのメールボックス
    async fn mailbox_of(&self, client: &ClientName) -> Option<MailboxAddress>;

    /// 全ルームのスナップショット
    async fn rooms(&self) -> Vec<Room>;
}

/// Heartbeat Table へのアクセス（単一の排他ロック）
#[async_trait]
pub trait HeartbeatRepository: Send + Sync {
    async fn touch(&self, client: ClientName, now: Timestamp);

    async fn sweep(&self, timeout_millis: i64, now: Timestamp) -> Vec<ClientName>;

    async fn remove(&self, client: &ClientName) -> bool;

    async fn last_seen(&self, client: &ClientName) -> Option<Timestamp>;
}
