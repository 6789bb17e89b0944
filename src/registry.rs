// Participant registry: which bots are online and how to reach them

use log::info;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ArenaError;
use crate::participant::Participant;
use crate::store::{AiId, AiInfo, Datastore};

/// A registered bot together with its connection
#[derive(Clone)]
pub struct OnlineAi {
    pub info: AiInfo,
    pub client: Arc<dyn Participant>,
}

pub struct Registry {
    store: Arc<dyn Datastore>,
    online: Mutex<HashMap<AiId, OnlineAi>>,
    /// Serializes find-or-create so one (name, token) never yields two identities
    registration: Mutex<()>,
    max_name_length: usize,
}

impl Registry {
    pub fn new(store: Arc<dyn Datastore>, max_name_length: usize) -> Self {
        Registry {
            store,
            online: Mutex::new(HashMap::new()),
            registration: Mutex::new(()),
            max_name_length,
        }
    }

    fn validate(&self, name: &str, token: &str) -> Result<(), ArenaError> {
        if name.trim().is_empty() {
            return Err(ArenaError::InvalidCredentials("empty name".to_string()));
        }
        if name.chars().count() > self.max_name_length {
            return Err(ArenaError::InvalidCredentials(format!(
                "name longer than {} characters",
                self.max_name_length
            )));
        }
        if token.is_empty() {
            return Err(ArenaError::InvalidCredentials("empty token".to_string()));
        }
        Ok(())
    }

    /// Resolves (name, token) to a stored bot, creating it on first use
    fn resolve(&self, name: &str, token: &str) -> Result<Option<AiInfo>, ArenaError> {
        let ais = self.store.ais_for_token(token)?;
        Ok(ais.into_iter().find(|ai| ai.name == name))
    }

    /// Brings a bot online. Fails if that identity is already connected.
    pub fn register(
        &self,
        name: &str,
        token: &str,
        client: Arc<dyn Participant>,
    ) -> Result<AiInfo, ArenaError> {
        self.validate(name, token)?;

        let _registering = self.registration.lock();
        let info = match self.resolve(name, token)? {
            Some(info) => info,
            None => {
                let id = self.store.create_ai(name, token)?;
                self.store.lookup_ai(&id)?
            }
        };

        let mut online = self.online.lock();
        if online.contains_key(&info.id) {
            return Err(ArenaError::AlreadyConnected(name.to_string()));
        }
        online.insert(
            info.id.clone(),
            OnlineAi {
                info: info.clone(),
                client,
            },
        );
        info!("Bot {} ({}) is online", info.name, info.id);
        Ok(info)
    }

    /// Takes a bot offline after checking its credentials
    pub fn unregister(&self, name: &str, token: &str) -> Result<AiInfo, ArenaError> {
        self.validate(name, token)?;
        let info = self
            .resolve(name, token)?
            .ok_or_else(|| ArenaError::NotOnline(name.to_string()))?;
        self.remove(&info.id)
            .map(|ai| ai.info)
            .ok_or_else(|| ArenaError::NotOnline(name.to_string()))
    }

    pub fn remove(&self, id: &AiId) -> Option<OnlineAi> {
        let removed = self.online.lock().remove(id);
        if let Some(ai) = &removed {
            info!("Bot {} ({}) went offline", ai.info.name, ai.info.id);
        }
        removed
    }

    pub fn lookup_online(&self, id: &AiId) -> Option<OnlineAi> {
        self.online.lock().get(id).cloned()
    }

    /// Online bots, ordered by name
    pub fn list_online(&self) -> Vec<AiInfo> {
        let mut ais: Vec<AiInfo> = self
            .online
            .lock()
            .values()
            .map(|ai| ai.info.clone())
            .collect();
        ais.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        ais
    }
}
