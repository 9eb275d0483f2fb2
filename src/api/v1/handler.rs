use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

fn reply<T: Serialize>(data: T) -> warp::reply::Json {
    warp::reply::json(&ApiResponse::ok(data))
}

fn rejection<E: Into<ApiErrorCode>>(error: E) -> warp::Rejection {
    reject::custom(error.into())
}

// region connections

pub async fn list_connections(
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let users = connection_service
        .connections(user_id)
        .await
        .map_err(rejection)?;
    Ok(reply(users))
}

pub async fn list_partners(
    role: PartnerRole,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let users = match role {
        PartnerRole::Supplier => connection_service.suppliers(user_id).await,
        PartnerRole::Costumer => connection_service.costumers(user_id).await,
    }
    .map_err(rejection)?;
    Ok(reply(users))
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub removed: bool,
}

pub async fn remove_connection(
    other: UserId,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let removed = connection_service
        .remove_connection(user_id, other)
        .await
        .map_err(rejection)?;
    Ok(reply(RemovedResponse { removed }))
}

#[derive(Debug, Serialize)]
pub struct PartnerResponse {
    pub updated: bool,
}

pub async fn set_partner(
    other: UserId,
    role: PartnerRole,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let updated = connection_service
        .set_partner(user_id, other, role)
        .await
        .map_err(rejection)?;
    Ok(reply(PartnerResponse { updated }))
}

pub async fn remove_partner(
    other: UserId,
    role: PartnerRole,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let updated = connection_service
        .remove_partner(user_id, other, role)
        .await
        .map_err(rejection)?;
    Ok(reply(PartnerResponse { updated }))
}

#[derive(Debug, Serialize)]
pub struct RelationStatus {
    pub connected: bool,
    pub following: bool,
    pub followed_by: bool,
    pub blocking: bool,
    pub blocked_by: bool,
}

pub async fn relation_status(
    other: UserId,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
    follow_service: Arc<dyn FollowService>,
    block_service: Arc<dyn BlockService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let status = RelationStatus {
        connected: connection_service
            .are_connections(user_id, other)
            .await
            .map_err(rejection)?,
        following: follow_service
            .follows(user_id, other)
            .await
            .map_err(rejection)?,
        followed_by: follow_service
            .follows(other, user_id)
            .await
            .map_err(rejection)?,
        blocking: block_service
            .is_blocked(user_id, other)
            .await
            .map_err(rejection)?,
        blocked_by: block_service
            .is_blocked(other, user_id)
            .await
            .map_err(rejection)?,
    };
    Ok(reply(status))
}

// endregion

// region requests

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestListFilter {
    #[default]
    All,
    Unread,
    Read,
    Rejected,
    Unrejected,
}

#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    #[serde(default)]
    pub filter: RequestListFilter,
}

pub async fn list_requests(
    query: RequestListQuery,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let requests = match query.filter {
        RequestListFilter::All => connection_service.requests(user_id).await,
        RequestListFilter::Unread => connection_service.unread_requests(user_id).await,
        RequestListFilter::Read => connection_service.read_requests(user_id).await,
        RequestListFilter::Rejected => connection_service.rejected_requests(user_id).await,
        RequestListFilter::Unrejected => connection_service.unrejected_requests(user_id).await,
    }
    .map_err(rejection)?;
    Ok(reply(requests))
}

pub async fn list_sent_requests(
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let requests = connection_service
        .sent_requests(user_id)
        .await
        .map_err(rejection)?;
    Ok(reply(requests))
}

#[derive(Debug, Deserialize)]
pub struct AddConnectionRequest {
    pub to_user: UserId,
    pub message: Option<String>,
}

pub async fn add_connection(
    body: AddConnectionRequest,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let request = connection_service
        .add_connection(user_id, body.to_user, body.message.as_deref())
        .await
        .map_err(rejection)?;
    Ok(reply(request))
}

#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub connected_with: UserId,
}

/// The signed-in user is always the recipient of the request they act on.
pub async fn accept_request(
    from_user: UserId,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    connection_service
        .accept_request(from_user, user_id)
        .await
        .map_err(rejection)?;
    Ok(reply(AcceptResponse {
        connected_with: from_user,
    }))
}

pub async fn reject_request(
    from_user: UserId,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let request = connection_service
        .reject_request(from_user, user_id)
        .await
        .map_err(rejection)?;
    Ok(reply(request))
}

pub async fn view_request(
    from_user: UserId,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let request = connection_service
        .mark_request_viewed(from_user, user_id)
        .await
        .map_err(rejection)?;
    Ok(reply(request))
}

/// Cancels a request the signed-in user sent to `to_user`.
pub async fn cancel_request(
    to_user: UserId,
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    connection_service
        .cancel_request(user_id, to_user)
        .await
        .map_err(rejection)?;
    Ok(reply(RemovedResponse { removed: true }))
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub unread_request_count: u64,
}

pub async fn dashboard(
    user_id: UserId,
    connection_service: Arc<dyn ConnectionService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let unread_request_count = connection_service
        .unread_request_count(user_id)
        .await
        .map_err(rejection)?;
    Ok(reply(DashboardResponse {
        unread_request_count,
    }))
}

// endregion

// region follows and blocks

pub async fn list_followers(
    user_id: UserId,
    follow_service: Arc<dyn FollowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let users = follow_service.followers(user_id).await.map_err(rejection)?;
    Ok(reply(users))
}

pub async fn list_following(
    user_id: UserId,
    follow_service: Arc<dyn FollowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let users = follow_service.following(user_id).await.map_err(rejection)?;
    Ok(reply(users))
}

pub async fn follow(
    followee: UserId,
    user_id: UserId,
    follow_service: Arc<dyn FollowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let edge = follow_service
        .add_follower(user_id, followee)
        .await
        .map_err(rejection)?;
    Ok(reply(edge))
}

pub async fn unfollow(
    followee: UserId,
    user_id: UserId,
    follow_service: Arc<dyn FollowService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let removed = follow_service
        .remove_follower(user_id, followee)
        .await
        .map_err(rejection)?;
    Ok(reply(RemovedResponse { removed }))
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockListDirection {
    /// Users the signed-in user blocks.
    #[default]
    Blocking,
    /// Users who block the signed-in user.
    Blocked,
    Both,
}

#[derive(Debug, Deserialize)]
pub struct BlockListQuery {
    #[serde(default)]
    pub direction: BlockListDirection,
}

pub async fn list_blocks(
    query: BlockListQuery,
    user_id: UserId,
    block_service: Arc<dyn BlockService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let users = match query.direction {
        BlockListDirection::Blocking => block_service.blocking(user_id).await,
        BlockListDirection::Blocked => block_service.blocked(user_id).await,
        BlockListDirection::Both => block_service.blocks(user_id).await,
    }
    .map_err(rejection)?;
    Ok(reply(users))
}

pub async fn block(
    blocked: UserId,
    user_id: UserId,
    block_service: Arc<dyn BlockService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let edge = block_service
        .add_block(user_id, blocked)
        .await
        .map_err(rejection)?;
    Ok(reply(edge))
}

pub async fn unblock(
    blocked: UserId,
    user_id: UserId,
    block_service: Arc<dyn BlockService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let removed = block_service
        .remove_block(user_id, blocked)
        .await
        .map_err(rejection)?;
    Ok(reply(RemovedResponse { removed }))
}

// endregion

// region messages and payment

#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    pub recipient: UserId,
    pub xml_type: String,
    pub xml: String,
    #[serde(default)]
    pub peppol_classic: bool,
    pub parent_msg: Option<MessageId>,
}

pub async fn compose_message(
    body: ComposeRequest,
    user_id: UserId,
    messaging_service: Arc<dyn MessagingService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let input = ComposeInput {
        sender: user_id,
        recipient: body.recipient,
        document: InvoiceDocument {
            xml_type: body.xml_type,
            xml: body.xml,
            peppol_classic: body.peppol_classic,
        },
        parent_msg: body.parent_msg,
    };
    let sent = messaging_service.compose(input).await.map_err(rejection)?;
    Ok(reply(sent))
}

pub async fn inbox(
    user_id: UserId,
    messaging_service: Arc<dyn MessagingService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let messages = messaging_service.inbox(user_id).await.map_err(rejection)?;
    Ok(reply(messages))
}

pub async fn outbox(
    user_id: UserId,
    messaging_service: Arc<dyn MessagingService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let messages = messaging_service.outbox(user_id).await.map_err(rejection)?;
    Ok(reply(messages))
}

/// Checkout surfaces that share the payment flow.
#[derive(Debug, Clone, Copy)]
pub enum PaymentChannel {
    Webshop,
    Procurement,
}

impl std::str::FromStr for PaymentChannel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "webshop" => Ok(PaymentChannel::Webshop),
            "procurement" => Ok(PaymentChannel::Procurement),
            _ => Err(()),
        }
    }
}

pub async fn pay(
    channel: PaymentChannel,
    body: PaymentRequest,
    user_id: UserId,
    payment_service: Arc<dyn PaymentService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    info!(?channel, sender = %user_id, "checkout submitted");
    let receipt = payment_service
        .pay(user_id, body)
        .await
        .map_err(rejection)?;
    Ok(reply(receipt))
}

// endregion
