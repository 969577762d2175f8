// Local container registry
// Get-or-create instances by id and stop them after they sit idle

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use hyper::{Request, Response};
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tokio::sync::Mutex;

use super::instance::{ContainerInstance, UpstreamClient};
use super::{ContainerSpec, LifecycleHooks};
use crate::error::ForwardError;
use crate::http::{self, Body};

pub struct ContainerRegistry {
    spec: ContainerSpec,
    hooks: Arc<dyn LifecycleHooks>,
    client: UpstreamClient,
    instances: Mutex<HashMap<String, Arc<ContainerInstance>>>,
    weak_self: Weak<Self>,
}

impl ContainerRegistry {
    pub fn new(spec: ContainerSpec, hooks: Arc<dyn LifecycleHooks>) -> Arc<Self> {
        let client = Client::builder(TokioExecutor::new()).build_http();
        Arc::new_cyclic(|weak_self| Self {
            spec,
            hooks,
            client,
            instances: Mutex::new(HashMap::new()),
            weak_self: weak_self.clone(),
        })
    }

    pub const fn spec(&self) -> &ContainerSpec {
        &self.spec
    }

    /// Return the running instance for `id`, starting one if there is none
    ///
    /// The map lock is held while starting so concurrent callers for the same
    /// id share one instance.
    pub async fn get_or_create(&self, id: &str) -> Result<Arc<ContainerInstance>, ForwardError> {
        let mut instances = self.instances.lock().await;
        if let Some(instance) = instances.get(id) {
            return Ok(Arc::clone(instance));
        }

        let instance = Arc::new(
            ContainerInstance::start(id, &self.spec, self.client.clone(), Arc::clone(&self.hooks))
                .await?,
        );
        instances.insert(id.to_string(), Arc::clone(&instance));
        drop(instances);

        self.hooks.on_start(id);
        self.watch_idle(Arc::downgrade(&instance));
        Ok(instance)
    }

    /// Get-or-create `id` and forward the request to it
    ///
    /// A start failure fires the error hook and answers `502`, the same status
    /// an unreachable running instance produces.
    pub async fn fetch(&self, id: &str, req: Request<Body>) -> Response<Body> {
        match self.get_or_create(id).await {
            Ok(instance) => instance.fetch(req).await,
            Err(e) => {
                self.hooks.on_error(id, &e);
                http::build_502_response()
            }
        }
    }

    /// Whether an instance for `id` is currently registered
    pub async fn is_running(&self, id: &str) -> bool {
        self.instances.lock().await.contains_key(id)
    }

    /// Stop every instance, used on shutdown
    pub async fn stop_all(&self) {
        let drained: Vec<_> = self.instances.lock().await.drain().map(|(_, i)| i).collect();
        for instance in drained {
            instance.stop().await;
        }
    }

    /// Remove `instance` once it has been idle for `sleep_after`
    fn watch_idle(&self, instance: Weak<ContainerInstance>) {
        let registry = self.weak_self.clone();
        let sleep_after = self.spec.sleep_after;

        tokio::spawn(async move {
            let mut wait = sleep_after;
            loop {
                tokio::time::sleep(wait).await;

                let (Some(registry), Some(current)) = (registry.upgrade(), instance.upgrade())
                else {
                    return;
                };

                match current.idle_for() {
                    Some(idle) if idle >= sleep_after => {
                        let mut instances = registry.instances.lock().await;
                        // Stale if the id was stopped and recreated meanwhile
                        if instances
                            .get(current.id())
                            .is_some_and(|i| Arc::ptr_eq(i, &current))
                        {
                            instances.remove(current.id());
                            drop(instances);
                            current.stop().await;
                        }
                        return;
                    }
                    Some(idle) => wait = sleep_after - idle,
                    None => wait = sleep_after,
                }
            }
        });
    }
}
