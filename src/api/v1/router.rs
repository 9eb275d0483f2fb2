use super::error::*;
use super::handler;
use super::handler::PaymentChannel;
use crate::application_port::*;
use crate::domain_model::*;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let auth = || with_verification(server.session_verifier.clone());
    let connections = || with(server.connection_service.clone());
    let follows = || with(server.follow_service.clone());
    let blocks = || with(server.block_service.clone());
    let messaging = || with(server.messaging_service.clone());
    let payment = || with(server.payment_service.clone());

    // region connections

    let list_connections = warp::get()
        .and(warp::path!("connections"))
        .and(auth())
        .and(connections())
        .and_then(handler::list_connections);

    let list_partners = warp::get()
        .and(warp::path!("connections" / "partners" / PartnerRole))
        .and(auth())
        .and(connections())
        .and_then(handler::list_partners);

    let remove_connection = warp::delete()
        .and(warp::path!("connections" / UserId))
        .and(auth())
        .and(connections())
        .and_then(handler::remove_connection);

    let set_partner = warp::put()
        .and(warp::path!("connections" / UserId / PartnerRole))
        .and(auth())
        .and(connections())
        .and_then(handler::set_partner);

    let remove_partner = warp::delete()
        .and(warp::path!("connections" / UserId / PartnerRole))
        .and(auth())
        .and(connections())
        .and_then(handler::remove_partner);

    let relation_status = warp::get()
        .and(warp::path!("relations" / UserId))
        .and(auth())
        .and(connections())
        .and(follows())
        .and(blocks())
        .and_then(handler::relation_status);

    // endregion

    // region requests

    let list_requests = warp::get()
        .and(warp::path!("requests"))
        .and(warp::query::<handler::RequestListQuery>())
        .and(auth())
        .and(connections())
        .and_then(handler::list_requests);

    let list_sent_requests = warp::get()
        .and(warp::path!("requests" / "sent"))
        .and(auth())
        .and(connections())
        .and_then(handler::list_sent_requests);

    let add_connection = warp::post()
        .and(warp::path!("requests"))
        .and(warp::body::json())
        .and(auth())
        .and(connections())
        .and_then(handler::add_connection);

    let accept_request = warp::post()
        .and(warp::path!("requests" / UserId / "accept"))
        .and(auth())
        .and(connections())
        .and_then(handler::accept_request);

    let reject_request = warp::post()
        .and(warp::path!("requests" / UserId / "reject"))
        .and(auth())
        .and(connections())
        .and_then(handler::reject_request);

    let view_request = warp::post()
        .and(warp::path!("requests" / UserId / "view"))
        .and(auth())
        .and(connections())
        .and_then(handler::view_request);

    let cancel_request = warp::delete()
        .and(warp::path!("requests" / "sent" / UserId))
        .and(auth())
        .and(connections())
        .and_then(handler::cancel_request);

    let dashboard = warp::get()
        .and(warp::path!("dashboard"))
        .and(auth())
        .and(connections())
        .and_then(handler::dashboard);

    // endregion

    // region follows and blocks

    let list_followers = warp::get()
        .and(warp::path!("followers"))
        .and(auth())
        .and(follows())
        .and_then(handler::list_followers);

    let list_following = warp::get()
        .and(warp::path!("following"))
        .and(auth())
        .and(follows())
        .and_then(handler::list_following);

    let follow = warp::put()
        .and(warp::path!("following" / UserId))
        .and(auth())
        .and(follows())
        .and_then(handler::follow);

    let unfollow = warp::delete()
        .and(warp::path!("following" / UserId))
        .and(auth())
        .and(follows())
        .and_then(handler::unfollow);

    let list_blocks = warp::get()
        .and(warp::path!("blocks"))
        .and(warp::query::<handler::BlockListQuery>())
        .and(auth())
        .and(blocks())
        .and_then(handler::list_blocks);

    let block = warp::put()
        .and(warp::path!("blocks" / UserId))
        .and(auth())
        .and(blocks())
        .and_then(handler::block);

    let unblock = warp::delete()
        .and(warp::path!("blocks" / UserId))
        .and(auth())
        .and(blocks())
        .and_then(handler::unblock);

    // endregion

    // region messages and payment

    let compose = warp::post()
        .and(warp::path!("messages"))
        .and(warp::body::json())
        .and(auth())
        .and(messaging())
        .and_then(handler::compose_message);

    let inbox = warp::get()
        .and(warp::path!("messages" / "inbox"))
        .and(auth())
        .and(messaging())
        .and_then(handler::inbox);

    let outbox = warp::get()
        .and(warp::path!("messages" / "outbox"))
        .and(auth())
        .and(messaging())
        .and_then(handler::outbox);

    let pay = warp::post()
        .and(warp::path!("payment" / PaymentChannel))
        .and(warp::body::json())
        .and(auth())
        .and(payment())
        .and_then(handler::pay);

    // endregion

    let connection_routes = list_connections
        .or(list_partners)
        .or(remove_connection)
        .or(set_partner)
        .or(remove_partner)
        .or(relation_status);
    let request_routes = list_requests
        .or(list_sent_requests)
        .or(add_connection)
        .or(accept_request)
        .or(reject_request)
        .or(view_request)
        .or(cancel_request)
        .or(dashboard);
    let edge_routes = list_followers
        .or(list_following)
        .or(follow)
        .or(unfollow)
        .or(list_blocks)
        .or(block)
        .or(unblock);
    let message_routes = compose.or(inbox).or(outbox).or(pay);

    connection_routes
        .or(request_routes)
        .or(edge_routes)
        .or(message_routes)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_verification(
    session_verifier: Arc<dyn SessionVerifier>,
) -> impl Filter<Extract = (UserId,), Error = warp::Rejection> + Clone {
    warp::header::<String>(http::header::AUTHORIZATION.as_ref()).and_then(move |token: String| {
        let session_verifier = session_verifier.clone();
        async move {
            if let Some(token) = token.strip_prefix("Bearer ") {
                let user_id = session_verifier
                    .verify_token(token)
                    .await
                    .map_err(ApiErrorCode::from)
                    .map_err(reject::custom)?;
                Ok(user_id)
            } else {
                Err(reject::custom(ApiErrorCode::InvalidToken))
            }
        }
    })
}
