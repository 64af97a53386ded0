// src/services/optimistic.rs

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cache de consultas: cada chave guarda um valor imutável (`Arc<V>`) que é
/// sempre trocado inteiro, nunca alterado no lugar.
///
/// Nenhum lock é mantido durante um `.await` externo.
pub struct QueryCache<K, V> {
    entries: RwLock<HashMap<K, Arc<V>>>,
}

/// Foto do valor anterior a uma escrita especulativa, usada no rollback.
#[derive(Debug)]
pub struct Speculation<K, V> {
    key: K,
    previous: Arc<V>,
}

impl<K, V> Speculation<K, V> {
    #[cfg(test)]
    fn previous(&self) -> &Arc<V> {
        &self.previous
    }
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &K) -> Option<Arc<V>> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: K, value: V) -> Arc<V> {
        let value = Arc::new(value);
        self.entries.write().await.insert(key, value.clone());
        value
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    /// Fase 1+2: fotografa o valor atual e publica `patch(atual)` no lugar.
    /// Chave fria (invalidada no meio do caminho) parte de `seed`, que vira a foto.
    pub async fn speculate<F>(&self, key: &K, seed: Arc<V>, patch: F) -> Speculation<K, V>
    where
        F: FnOnce(&V) -> V,
    {
        let mut entries = self.entries.write().await;
        let previous = entries.get(key).cloned().unwrap_or(seed);
        entries.insert(key.clone(), Arc::new(patch(&previous)));
        Speculation {
            key: key.clone(),
            previous,
        }
    }

    /// Restaura exatamente a foto tirada em `speculate`.
    pub async fn rollback(&self, speculation: Speculation<K, V>) {
        self.entries
            .write()
            .await
            .insert(speculation.key, speculation.previous);
    }

    /// Protocolo completo: foto -> aplica especulativamente -> dispara a escrita
    /// -> rollback se ela falhar.
    ///
    /// A escrita só é criada depois que o cache já mostra a mudança. A
    /// reconciliação pós-escrita fica com quem chama, que sabe como recarregar.
    pub async fn mutate<F, W, Fut, T, E>(&self, key: &K, seed: Arc<V>, patch: F, write: W) -> Result<T, E>
    where
        F: FnOnce(&V) -> V,
        W: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let speculation = self.speculate(key, seed, patch).await;

        match write().await {
            Ok(value) => Ok(value),
            Err(err) => {
                self.rollback(speculation).await;
                Err(err)
            }
        }
    }
}
