//! Terminal storefront: turns user commands and completed requests into view
//! updates and new requests.
//!
//! `App` performs no I/O. `handle` consumes one event and returns the
//! effects (requests) the runtime should execute; each completion comes back
//! as another event. A failed purchase raises a modal alert: until the user
//! dismisses it, every input line only closes the alert.

use std::time::SystemTime;

use sweets_core::{
    Credential, HttpRequest, LoadTicket, LoginRequest, Outcome, PendingLoad, PendingPurchase,
    PurchaseResult, PurchaseTicket, Storefront,
};

pub const USAGE: &str = "commands: buy <id> | r (refresh) | q (quit)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Purchase(u64),
    Refresh,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let command = match (words.next()?, words.next()) {
            ("q" | "quit", None) => Command::Quit,
            ("r" | "refresh", None) => Command::Refresh,
            ("buy" | "b", Some(id)) => Command::Purchase(id.parse().ok()?),
            _ => return None,
        };
        words.next().is_none().then_some(command)
    }
}

#[derive(Debug)]
pub enum Event {
    Input(String),
    /// No more input will arrive. Stops the app even while an alert is up.
    InputClosed,
    LoadCompleted(LoadTicket, Outcome),
    PurchaseCompleted(PurchaseTicket, Outcome),
    LoginCompleted(Outcome),
}

#[derive(Debug)]
pub enum Effect {
    Load(PendingLoad),
    Purchase(PendingPurchase),
    Login(HttpRequest),
}

impl Effect {
    pub fn request(&self) -> &HttpRequest {
        match self {
            Effect::Load(pending) => &pending.request,
            Effect::Purchase(pending) => &pending.request,
            Effect::Login(request) => request,
        }
    }

    /// Pair this effect's ticket with the outcome of executing its request.
    pub fn complete(self, outcome: Outcome) -> Event {
        match self {
            Effect::Load(pending) => Event::LoadCompleted(pending.ticket, outcome),
            Effect::Purchase(pending) => Event::PurchaseCompleted(pending.ticket, outcome),
            Effect::Login(_) => Event::LoginCompleted(outcome),
        }
    }
}

/// A user action waiting on a credential refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Mount,
    Refresh,
    Purchase(u64),
}

#[derive(Debug)]
pub struct App {
    view: Storefront,
    login: Option<LoginRequest>,
    currency: String,
    alert: Option<String>,
    hint: Option<String>,
    queued: Vec<Action>,
    logging_in: bool,
    running: bool,
    clock: fn() -> SystemTime,
}

impl App {
    pub fn new(view: Storefront, login: Option<LoginRequest>, currency: impl Into<String>) -> Self {
        Self {
            view,
            login,
            currency: currency.into(),
            alert: None,
            hint: None,
            queued: Vec::new(),
            logging_in: false,
            running: true,
            clock: SystemTime::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> SystemTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn view(&self) -> &Storefront {
        &self.view
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Mount the view and request the first list.
    pub fn start(&mut self) -> Vec<Effect> {
        self.dispatch(Action::Mount)
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        if !self.running {
            return Vec::new();
        }
        match event {
            Event::Input(line) => self.on_input(&line),
            Event::InputClosed => {
                self.quit();
                Vec::new()
            }
            Event::LoadCompleted(ticket, outcome) => {
                self.view.complete_load(ticket, outcome);
                Vec::new()
            }
            Event::PurchaseCompleted(ticket, outcome) => match self.view.complete_purchase(ticket, outcome) {
                PurchaseResult::Reload(pending) => vec![Effect::Load(pending)],
                PurchaseResult::Notify(message) => {
                    self.alert = Some(message);
                    Vec::new()
                }
                PurchaseResult::Discarded => Vec::new(),
            },
            Event::LoginCompleted(outcome) => self.on_login(outcome),
        }
    }

    /// Current screen: the page, then either the modal alert or the prompt.
    pub fn render(&self) -> String {
        let mut screen = self.view.page(&self.currency).to_string();
        match (&self.alert, &self.hint) {
            (Some(alert), _) => {
                screen.push_str(&format!("\n*** {alert} ***\n[press Enter to dismiss]\n"));
            }
            (None, Some(hint)) => {
                screen.push_str(&format!("\n{hint}\n{USAGE}\n> "));
            }
            (None, None) => {
                screen.push_str(&format!("\n{USAGE}\n> "));
            }
        }
        screen
    }

    fn on_input(&mut self, line: &str) -> Vec<Effect> {
        if self.alert.take().is_some() {
            return Vec::new();
        }
        self.hint = None;
        if line.trim().is_empty() {
            return Vec::new();
        }
        match Command::parse(line) {
            Some(Command::Quit) => {
                self.quit();
                Vec::new()
            }
            Some(Command::Refresh) => self.dispatch(Action::Refresh),
            Some(Command::Purchase(id)) => {
                let card = self.view.page(&self.currency).cards.into_iter().find(|c| c.id == id);
                match card {
                    Some(card) if card.purchasable => self.dispatch(Action::Purchase(id)),
                    Some(card) => {
                        self.hint = Some(format!("{} is out of stock", card.name));
                        Vec::new()
                    }
                    None => {
                        self.hint = Some(format!("no sweet with id {id}"));
                        Vec::new()
                    }
                }
            }
            None => {
                self.hint = Some(format!("unrecognised command: {}", line.trim()));
                Vec::new()
            }
        }
    }

    fn quit(&mut self) {
        self.view.unmount();
        self.running = false;
    }

    fn dispatch(&mut self, action: Action) -> Vec<Effect> {
        if !self.needs_login() {
            return self.perform(action);
        }
        self.queued.push(action);
        if self.logging_in {
            return Vec::new();
        }
        let Some(login) = &self.login else {
            return self.drain_queue();
        };
        match self.view.client().build_login(login) {
            Ok(request) => {
                tracing::info!("credential expired, logging in");
                self.logging_in = true;
                vec![Effect::Login(request)]
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not build login request");
                self.drain_queue()
            }
        }
    }

    fn on_login(&mut self, outcome: Outcome) -> Vec<Effect> {
        self.logging_in = false;
        let result = outcome
            .map_err(|e| {
                tracing::warn!(error = %e, "login request did not complete");
                sweets_core::ApiError::Login { status: None }
            })
            .and_then(|response| self.view.client().parse_login(response));
        match result {
            Ok(token) => {
                self.view
                    .client_mut()
                    .rotate_credential(Credential::bearer(token.access_token));
            }
            Err(e) => {
                tracing::warn!(error = %e, status = ?e.status(), "login failed");
                self.alert = Some(e.to_string());
            }
        }
        self.drain_queue()
    }

    /// Run queued actions with whatever credential we now hold.
    fn drain_queue(&mut self) -> Vec<Effect> {
        let queued = std::mem::take(&mut self.queued);
        queued.into_iter().flat_map(|action| self.perform(action)).collect()
    }

    fn perform(&mut self, action: Action) -> Vec<Effect> {
        let effect = match action {
            Action::Mount => Effect::Load(self.view.mount()),
            Action::Refresh => Effect::Load(self.view.begin_load()),
            Action::Purchase(id) => Effect::Purchase(self.view.begin_purchase(id)),
        };
        vec![effect]
    }

    fn needs_login(&self) -> bool {
        self.login.is_some() && self.view.client().credential().is_expired_at((self.clock)())
    }
}
