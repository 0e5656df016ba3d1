use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zpcrawl::domain::models::proxy::ProxyDescriptor;
use zpcrawl::engines::traits::{PageSession, SessionError, SessionFactory};

/// 按顺序回放预设响应的会话工厂
///
/// 所有会话共享同一个响应队列；`None` 表示该页等待超时。
#[derive(Clone, Default)]
pub struct ScriptedSessionFactory {
    responses: Arc<Mutex<VecDeque<Option<Value>>>>,
    events: Arc<Mutex<Vec<String>>>,
    refuse_proxies: Arc<Mutex<Vec<ProxyDescriptor>>>,
}

impl ScriptedSessionFactory {
    pub fn new(responses: Vec<Option<Value>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            ..Default::default()
        }
    }

    /// 使用该代理打开会话时返回启动失败
    pub fn refuse(&self, proxy: ProxyDescriptor) {
        self.refuse_proxies.lock().unwrap().push(proxy);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push_event(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl SessionFactory for ScriptedSessionFactory {
    type Session = ScriptedSession;

    async fn open(&self, proxy: Option<&ProxyDescriptor>) -> Result<ScriptedSession, SessionError> {
        if let Some(proxy) = proxy {
            if self.refuse_proxies.lock().unwrap().contains(proxy) {
                self.push_event(format!("refused {}", proxy));
                return Err(SessionError::Launch(format!("cannot reach {}", proxy)));
            }
        }
        let label = proxy
            .map(ToString::to_string)
            .unwrap_or_else(|| "direct".to_string());
        self.push_event(format!("open {}", label));
        Ok(ScriptedSession {
            factory: self.clone(),
            label,
            pending: None,
            closed: false,
        })
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub struct ScriptedSession {
    factory: ScriptedSessionFactory,
    label: String,
    pending: Option<Value>,
    closed: bool,
}

#[async_trait]
impl PageSession for ScriptedSession {
    async fn listen(&mut self, _path_substring: &str) -> Result<(), SessionError> {
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        self.factory.push_event(format!("navigate {} {}", self.label, url));
        self.pending = self
            .factory
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .flatten();
        Ok(())
    }

    async fn wait_for_response(
        &mut self,
        _path_substring: &str,
        _timeout: Duration,
    ) -> Result<Value, SessionError> {
        self.pending.take().ok_or(SessionError::Timeout)
    }

    async fn quit(&mut self) -> Result<(), SessionError> {
        if !self.closed {
            self.closed = true;
            self.factory.push_event(format!("quit {}", self.label));
        }
        Ok(())
    }
}
