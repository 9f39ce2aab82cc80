use std::collections::VecDeque;
use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::{
    future,
    stream::{self, Stream, StreamExt},
};
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::notifications::{
    AlertCounts, AlertEvent, AlertTracker, ChangeEvent, MarkedRead, Notification,
    NotificationPreferences, NotificationQuery, NotificationService, UpdatePreferencesRequest,
};
use crate::AppState;

/// The caller's notification history, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationQuery),
    responses((status = 200, description = "Notification history", body = Vec<Notification>)),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state
        .notifications
        .list(user.user_id, query.unread_only, query.effective_limit())
        .await?;
    Ok(Json(notifications))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 404, description = "Notification not found")
    ),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.notifications.mark_read(id, user.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/notifications/read-all",
    responses((status = 200, description = "All marked as read", body = MarkedRead)),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<MarkedRead>, ApiError> {
    let updated = state.notifications.mark_all_read(user.user_id).await?;
    Ok(Json(MarkedRead { updated }))
}

#[utoipa::path(
    get,
    path = "/api/notifications/preferences",
    responses((status = 200, description = "Current preferences", body = NotificationPreferences)),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn get_preferences(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<NotificationPreferences>, ApiError> {
    Ok(Json(state.notifications.preferences(user.user_id).await?))
}

#[utoipa::path(
    put,
    path = "/api/notifications/preferences",
    request_body = UpdatePreferencesRequest,
    responses((status = 200, description = "Saved preferences", body = NotificationPreferences)),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn update_preferences(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<UpdatePreferencesRequest>,
) -> Result<Json<NotificationPreferences>, ApiError> {
    let prefs = state
        .notifications
        .update_preferences(user.user_id, &request)
        .await?;
    info!(user_id = %user.user_id, "Notification preferences updated");
    Ok(Json(prefs))
}

/// Outstanding alert counts for the caller
#[utoipa::path(
    get,
    path = "/api/notifications/alerts",
    responses((status = 200, description = "Alert counts", body = AlertCounts)),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn get_alert_counts(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<AlertCounts>, ApiError> {
    Ok(Json(state.notifications.alert_counts(&user).await?))
}

/// Live alert stream (Server-Sent Events)
///
/// Emits `counts` on connect and after every visible change, and `alert`
/// when the total grew since the previous observation.
#[utoipa::path(
    get,
    path = "/api/notifications/stream",
    params(("access_token" = Option<String>, Query, description = "Token for clients that cannot set headers")),
    responses((status = 200, description = "text/event-stream of counts and alert events")),
    security(("bearer_auth" = [])),
    tag = "notifications"
)]
pub async fn notification_stream(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let prefs = state.notifications.preferences(user.user_id).await?;
    let rx = state.change_feed.subscribe();
    info!(
        user_id = %user.user_id,
        admin = user.is_admin(),
        listeners = state.change_feed.subscriber_count(),
        "Notification stream opened"
    );

    let live = LiveAlerts::new(state.notifications.clone(), rx, user, prefs.sound_enabled);
    let events = live
        .into_stream()
        .filter_map(|alert| future::ready(alert.into_event().map(Ok::<Event, Infallible>)));

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

/// One item of a live alert stream
#[derive(Debug, Clone, PartialEq)]
pub enum LiveAlert {
    /// Current counts, sent on connect and after each relevant change
    Counts(AlertCounts),
    /// The total went up since the previous counts
    Alert(AlertEvent),
}

impl LiveAlert {
    fn into_event(self) -> Option<Event> {
        let encoded = match &self {
            LiveAlert::Counts(counts) => Event::default().event("counts").json_data(counts),
            LiveAlert::Alert(alert) => Event::default().event("alert").json_data(alert),
        };
        match encoded {
            Ok(event) => Some(event),
            Err(e) => {
                warn!("Failed to encode live alert {:?}: {}", self, e);
                None
            }
        }
    }
}

/// What a stream does with one message from the change feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedStep {
    Refresh,
    Skip,
    Close,
}

fn feed_step(caller: &AuthenticatedUser, received: Result<ChangeEvent, RecvError>) -> FeedStep {
    match received {
        Ok(change) if change.is_visible_to(caller.user_id, caller.is_admin()) => FeedStep::Refresh,
        Ok(_) => FeedStep::Skip,
        // Missed events may have been relevant
        Err(RecvError::Lagged(skipped)) => {
            warn!(user_id = %caller.user_id, skipped, "Notification stream lagged");
            FeedStep::Refresh
        }
        Err(RecvError::Closed) => {
            debug!(user_id = %caller.user_id, "Change feed closed");
            FeedStep::Close
        }
    }
}

/// Items to emit for freshly computed counts
fn alerts_for(tracker: &mut AlertTracker, counts: AlertCounts, play_sound: bool) -> Vec<LiveAlert> {
    let mut alerts = vec![LiveAlert::Counts(counts)];
    if let Some(previous_total) = tracker.observe(counts.total()) {
        alerts.push(LiveAlert::Alert(AlertEvent {
            total_alerts: counts.total(),
            previous_total,
            play_sound,
        }));
    }
    alerts
}

pub(crate) struct LiveAlerts {
    service: NotificationService,
    rx: Receiver<ChangeEvent>,
    caller: AuthenticatedUser,
    tracker: AlertTracker,
    play_sound: bool,
    started: bool,
    outbox: VecDeque<LiveAlert>,
}

impl LiveAlerts {
    pub(crate) fn new(
        service: NotificationService,
        rx: Receiver<ChangeEvent>,
        caller: AuthenticatedUser,
        play_sound: bool,
    ) -> Self {
        Self {
            service,
            rx,
            caller,
            tracker: AlertTracker::new(),
            play_sound,
            started: false,
            outbox: VecDeque::new(),
        }
    }

    pub(crate) fn into_stream(self) -> impl Stream<Item = LiveAlert> {
        stream::unfold(self, |mut live| async move {
            loop {
                if let Some(alert) = live.outbox.pop_front() {
                    return Some((alert, live));
                }

                if !live.started {
                    live.started = true;
                    live.refresh().await;
                    continue;
                }

                let received = live.rx.recv().await;
                match feed_step(&live.caller, received) {
                    FeedStep::Refresh => live.refresh().await,
                    FeedStep::Skip => {}
                    FeedStep::Close => return None,
                }
            }
        })
    }

    /// Recompute counts and queue the resulting items
    async fn refresh(&mut self) {
        match self.service.alert_counts(&self.caller).await {
            Ok(counts) => {
                let alerts = alerts_for(&mut self.tracker, counts, self.play_sound);
                self.outbox.extend(alerts);
            }
            Err(e) => {
                warn!(user_id = %self.caller.user_id, "Failed to compute alert counts: {}", e);
            }
        }
    }
}
