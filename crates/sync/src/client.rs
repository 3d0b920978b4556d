use std::time::Duration as StdDuration;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;
use time::OffsetDateTime;
use tokio::sync::Mutex;

const COLON: &AsciiSet = &CONTROLS.add(b':');
const V: &str = "3.0.1";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub request_timeout: StdDuration,
    pub session_refresh_interval: StdDuration,
}

#[derive(Clone, Debug, Default)]
pub struct UpstreamEmployee {
    pub external_id: String,
    pub name: String,
    pub job_title: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct UpstreamEvent {
    pub external_id: String,
    pub location_mvid: Option<String>,
    pub project_name: String,
    pub start_datetime: i64,
    pub due_datetime: i64,
}

/// C7: the only place upstream wire encoding lives (§4.6) — every other
/// component passes structured arguments.
#[async_trait::async_trait]
pub trait UpstreamClient: Send + Sync {
    async fn push_assignment(
        &self,
        rep_id: &str,
        mplan_id: &str,
        location_id: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> schedcore_shared::Result<()>;

    async fn delete_assignment(&self, external_id: &str) -> schedcore_shared::Result<()>;

    async fn list_scheduled_events(&self, window_days: i64) -> schedcore_shared::Result<Vec<UpstreamEvent>>;

    async fn list_planning_events(&self) -> schedcore_shared::Result<Vec<UpstreamEvent>>;

    async fn list_available_reps(&self, window_days: i64) -> schedcore_shared::Result<Vec<UpstreamEmployee>>;

    async fn health_check(&self) -> bool;
}

struct Session {
    cookie: String,
    obtained_at: OffsetDateTime,
}

pub struct ReqwestUpstreamClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Mutex<Option<Session>>,
}

impl ReqwestUpstreamClient {
    pub fn new(config: ClientConfig) -> schedcore_shared::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| schedcore_shared::Error::Server(anyhow::anyhow!(err)))?;

        Ok(Self {
            http,
            config,
            session: Mutex::new(None),
        })
    }

    async fn cookie(&self) -> schedcore_shared::Result<String> {
        let mut session = self.session.lock().await;

        let stale = match session.as_ref() {
            Some(session) => {
                OffsetDateTime::now_utc() - session.obtained_at
                    > time::Duration::try_from(self.config.session_refresh_interval)
                        .unwrap_or(time::Duration::HOUR)
            }
            None => true,
        };

        if stale {
            *session = Some(self.login().await?);
        }

        Ok(session.as_ref().expect("just set").cookie.clone())
    }

    async fn login(&self) -> schedcore_shared::Result<Session> {
        #[derive(serde::Serialize)]
        struct Credentials<'a> {
            username: &'a str,
            password: &'a str,
        }

        let response = self
            .http
            .post(format!("{}/login/authenticate", self.config.base_url))
            .json(&Credentials {
                username: &self.config.username,
                password: &self.config.password,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            schedcore_shared::server!("upstream login failed with status {}", response.status());
        }

        let cookie = response
            .cookies()
            .next()
            .map(|c| format!("{}={}", c.name(), c.value()))
            .ok_or_else(|| schedcore_shared::Error::Server(anyhow::anyhow!("upstream login returned no cookie")))?;

        Ok(Session {
            cookie,
            obtained_at: OffsetDateTime::now_utc(),
        })
    }

    fn encode_timestamp(dt: OffsetDateTime) -> String {
        let format = time::macros::format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        );
        let formatted = dt.format(&format).unwrap_or_default();
        utf8_percent_encode(&formatted, COLON).to_string()
    }

    async fn authenticated_request(
        &self,
        build: impl Fn(&reqwest::Client, &str) -> reqwest::RequestBuilder,
    ) -> schedcore_shared::Result<reqwest::Response> {
        let cookie = self.cookie().await?;
        let response = build(&self.http, &cookie).send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            let mut session = self.session.lock().await;
            *session = Some(self.login().await?);
            let cookie = session.as_ref().expect("just set").cookie.clone();
            drop(session);
            return Ok(build(&self.http, &cookie).send().await?);
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl UpstreamClient for ReqwestUpstreamClient {
    async fn push_assignment(
        &self,
        rep_id: &str,
        mplan_id: &str,
        location_id: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> schedcore_shared::Result<()> {
        let body = format!(
            "ClassName=MVScheduledmPlan&RepID={rep_id}&mPlanID={mplan_id}&LocationID={location_id}&Start={}&End={}&hash=&v={V}&PlanningOverride=true",
            Self::encode_timestamp(start),
            Self::encode_timestamp(end),
        );

        let response = self
            .authenticated_request(|http, cookie| {
                http.post(format!("{}/planningextcontroller/scheduleMplanEvent", self.config.base_url))
                    .header(reqwest::header::COOKIE, cookie)
                    .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(body.clone())
            })
            .await?;

        if !response.status().is_success() {
            schedcore_shared::server!("push assignment failed with status {}", response.status());
        }

        Ok(())
    }

    async fn delete_assignment(&self, external_id: &str) -> schedcore_shared::Result<()> {
        let response = self
            .authenticated_request(|http, cookie| {
                http.post(format!(
                    "{}/planningextcontroller/deleteMplanEvent/{external_id}",
                    self.config.base_url
                ))
                .header(reqwest::header::COOKIE, cookie)
            })
            .await?;

        if !response.status().is_success() {
            schedcore_shared::server!("delete assignment failed with status {}", response.status());
        }

        Ok(())
    }

    async fn list_scheduled_events(&self, window_days: i64) -> schedcore_shared::Result<Vec<UpstreamEvent>> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "externalId")]
            external_id: String,
            #[serde(rename = "locationId")]
            location_id: Option<String>,
            #[serde(rename = "projectName")]
            project_name: String,
            #[serde(rename = "startDatetime")]
            start_datetime: i64,
            #[serde(rename = "dueDatetime")]
            due_datetime: i64,
        }

        let response = self
            .authenticated_request(|http, cookie| {
                http.get(format!(
                    "{}/planningextcontroller/scheduledEvents?windowDays={window_days}",
                    self.config.base_url
                ))
                .header(reqwest::header::COOKIE, cookie)
            })
            .await?;

        let raw: Vec<Raw> = response.json().await?;
        Ok(raw
            .into_iter()
            .map(|r| UpstreamEvent {
                external_id: r.external_id,
                location_mvid: r.location_id,
                project_name: r.project_name,
                start_datetime: r.start_datetime,
                due_datetime: r.due_datetime,
            })
            .collect())
    }

    async fn list_planning_events(&self) -> schedcore_shared::Result<Vec<UpstreamEvent>> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(rename = "externalId")]
            external_id: String,
            #[serde(rename = "locationId")]
            location_id: Option<String>,
            #[serde(rename = "projectName")]
            project_name: String,
            #[serde(rename = "startDatetime")]
            start_datetime: i64,
            #[serde(rename = "dueDatetime")]
            due_datetime: i64,
        }

        let response = self
            .authenticated_request(|http, cookie| {
                http.get(format!("{}/planningextcontroller/planningEvents", self.config.base_url))
                    .header(reqwest::header::COOKIE, cookie)
            })
            .await?;

        let raw: Vec<Raw> = response.json().await?;
        Ok(raw
            .into_iter()
            .map(|r| UpstreamEvent {
                external_id: r.external_id,
                location_mvid: r.location_id,
                project_name: r.project_name,
                start_datetime: r.start_datetime,
                due_datetime: r.due_datetime,
            })
            .collect())
    }

    async fn list_available_reps(&self, window_days: i64) -> schedcore_shared::Result<Vec<UpstreamEmployee>> {
        #[derive(Deserialize)]
        struct Raw {
            id: Option<String>,
            #[serde(rename = "repId")]
            rep_id: Option<String>,
            #[serde(rename = "employeeId")]
            employee_id: Option<String>,
            title: String,
            role: Option<String>,
        }

        let response = self
            .authenticated_request(|http, cookie| {
                http.get(format!(
                    "{}/planningextcontroller/availableReps?windowDays={window_days}",
                    self.config.base_url
                ))
                .header(reqwest::header::COOKIE, cookie)
            })
            .await?;

        let raw: Vec<Raw> = response.json().await?;
        Ok(raw
            .into_iter()
            .map(|r| UpstreamEmployee {
                external_id: r
                    .rep_id
                    .or(r.employee_id)
                    .or(r.id)
                    .unwrap_or_default(),
                name: r.title,
                job_title: r.role,
            })
            .collect())
    }

    async fn health_check(&self) -> bool {
        let response = self
            .authenticated_request(|http, cookie| {
                http.get(format!(
                    "{}/planningextcontroller/availableReps?windowDays=0",
                    self.config.base_url
                ))
                .header(reqwest::header::COOKIE, cookie)
            })
            .await;

        matches!(response, Ok(response) if response.status().is_success())
    }
}
