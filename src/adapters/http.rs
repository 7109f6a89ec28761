//! Plain HTTP transport: load the search page in a cookie-keeping session,
//! replay its form with the query bound in, and read the result table.

use crate::adapters::{form_bindings, YEAR_FIELD};
use crate::core::table::{parse_rows, selector};
use crate::domain::model::{Query, RowTable, TableLayout};
use crate::domain::ports::PageFetcher;
use crate::utils::error::{Result, WatchError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use scraper::{ElementRef, Html};
use std::time::Duration;
use url::Url;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) course-watch/0.1";

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
}

/// Field state of the search form as a browser would submit it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub action: Option<String>,
    pub fields: Vec<(String, String)>,
}

impl SearchForm {
    /// Find the `<form>` that contains the element with id `anchor_id`.
    pub fn extract(html: &str, anchor_id: &str) -> Result<Option<Self>> {
        let document = Html::parse_document(html);
        let forms = selector("form")?;
        let anchor = selector(&format!("#{}", anchor_id))?;
        let controls = selector("input, select, textarea")?;

        let Some(form) = document
            .select(&forms)
            .find(|form| form.select(&anchor).next().is_some())
        else {
            return Ok(None);
        };

        let option = selector("option")?;
        let fields = form
            .select(&controls)
            .filter_map(|control| form_field(control, &option))
            .collect();

        Ok(Some(Self {
            action: form
                .value()
                .attr("action")
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
            fields,
        }))
    }

    /// Overwrite a field, dropping duplicates, or append it when absent.
    pub fn set(&mut self, name: &str, value: &str) {
        let mut seen = false;
        self.fields.retain_mut(|(key, current)| {
            if key.as_str() != name {
                return true;
            }
            if seen {
                return false;
            }
            seen = true;
            *current = value.to_string();
            true
        });
        if !seen {
            self.fields.push((name.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.as_str() == name)
            .map(|(_, value)| value.as_str())
    }

    /// Where the form posts to, relative to the page it came from.
    pub fn target(&self, page: &Url) -> Result<Url> {
        match &self.action {
            None => Ok(page.clone()),
            Some(action) => page.join(action).map_err(|e| {
                WatchError::parse(format!("form action '{}' is not a valid URL: {}", action, e))
            }),
        }
    }
}

/// Name and submitted value of one form control, if it would be submitted.
fn form_field(control: ElementRef<'_>, option: &scraper::Selector) -> Option<(String, String)> {
    let element = control.value();
    let name = element.attr("name").or_else(|| element.attr("id"))?;
    if element.attr("disabled").is_some() {
        return None;
    }

    let value = match element.name() {
        "input" => {
            let kind = element.attr("type").unwrap_or("text").to_ascii_lowercase();
            match kind.as_str() {
                "submit" | "button" | "reset" | "image" | "file" => return None,
                "checkbox" | "radio" if element.attr("checked").is_none() => return None,
                "checkbox" | "radio" => element.attr("value").unwrap_or("on").to_string(),
                _ => element.attr("value").unwrap_or_default().to_string(),
            }
        }
        "select" => {
            let options: Vec<ElementRef<'_>> = control.select(option).collect();
            options
                .iter()
                .find(|o| o.value().attr("selected").is_some())
                .or_else(|| options.first())
                .map(|o| {
                    o.value()
                        .attr("value")
                        .map(str::to_string)
                        .unwrap_or_else(|| o.text().collect::<String>().trim().to_string())
                })
                .unwrap_or_default()
        }
        _ => control.text().collect(),
    };

    Some((name.to_string(), value))
}

pub struct HttpFetcher {
    client: Client,
    landing: Url,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: HttpConfig) -> Result<Self> {
        crate::utils::validation::validate_url("source.endpoint", &config.endpoint)?;
        let landing = Url::parse(&config.endpoint).map_err(|e| WatchError::InvalidConfigValueError {
            field: "source.endpoint".to_string(),
            value: config.endpoint.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            client,
            landing,
            timeout: config.timeout,
        })
    }

    fn classify(&self, error: reqwest::Error, stage: &str) -> WatchError {
        if error.is_timeout() {
            WatchError::timeout(stage, self.timeout.as_secs())
        } else if error.is_connect() {
            WatchError::transport(format!("cannot connect while loading {}: {}", stage, error))
        } else {
            WatchError::HttpError(error)
        }
    }

    async fn read_body(&self, response: Response, stage: &str) -> Result<String> {
        let status = response.status();
        tracing::debug!("{} response status: {}", stage, status);
        if !status.is_success() {
            return Err(WatchError::transport(format!(
                "{} answered HTTP {} ({})",
                stage,
                status,
                response.url()
            )));
        }
        response.text().await.map_err(|e| self.classify(e, stage))
    }

    async fn load_form(&self) -> Result<SearchForm> {
        tracing::debug!("Loading search page {}", self.landing);
        let response = self
            .client
            .get(self.landing.clone())
            .send()
            .await
            .map_err(|e| self.classify(e, "search page"))?;
        let html = self.read_body(response, "search page").await?;

        match SearchForm::extract(&html, YEAR_FIELD)? {
            Some(form) => {
                tracing::debug!("Search form has {} fields", form.fields.len());
                Ok(form)
            }
            None => {
                tracing::warn!("No search form found on {}, posting bare parameters", self.landing);
                Ok(SearchForm::default())
            }
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn search(&mut self, query: &Query, layout: &TableLayout) -> Result<RowTable> {
        let mut form = self.load_form().await?;
        for (name, value) in form_bindings(query) {
            form.set(name, &value);
        }
        let target = form.target(&self.landing)?;

        tracing::debug!("Submitting search for {} to {}", query, target);
        let response = self
            .client
            .post(target)
            .form(&form.fields)
            .send()
            .await
            .map_err(|e| self.classify(e, "result table"))?;
        let html = self.read_body(response, "result table").await?;

        parse_rows(&html, &layout.row_selector)
    }
}
