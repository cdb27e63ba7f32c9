//! Processing modes and block execution

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use spotfield_core::{Error, Result};
#[cfg(feature = "parallel")]
use tracing::warn;

use crate::blocks::{Block, BlockIterator};

/// Processing mode for rasterization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Single-threaded processing
    Sequential,
    /// Parallel processing on the global pool (all available cores)
    #[default]
    Parallel,
    /// Parallel on a dedicated pool with the given number of threads
    ParallelWith(usize),
}

/// Strategy for running block tasks over an output buffer
pub trait ParallelStrategy {
    /// Split `output` into blocks of `block_size` items and run `f` on each.
    ///
    /// Every block runs to completion before this returns. If any block
    /// fails, the error of the lowest-numbered failing block is returned as
    /// [`Error::Worker`] and the contents of `output` are unspecified.
    fn for_each_block<T, F>(&self, output: &mut [T], block_size: usize, f: F) -> Result<()>
    where
        T: Send,
        F: Fn(Block, &mut [T]) -> Result<()> + Sync + Send;
}

impl ParallelStrategy for ProcessingMode {
    fn for_each_block<T, F>(&self, output: &mut [T], block_size: usize, f: F) -> Result<()>
    where
        T: Send,
        F: Fn(Block, &mut [T]) -> Result<()> + Sync + Send,
    {
        let block_size = block_size.max(1);
        match *self {
            ProcessingMode::Sequential => run_sequential(output, block_size, &f),
            #[cfg(feature = "parallel")]
            ProcessingMode::Parallel => run_parallel(output, block_size, &f),
            #[cfg(feature = "parallel")]
            ProcessingMode::ParallelWith(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| Error::Other(format!("failed to build thread pool: {e}")))?;
                pool.install(|| run_parallel(output, block_size, &f))
            }
            #[cfg(not(feature = "parallel"))]
            _ => run_sequential(output, block_size, &f),
        }
    }
}

fn run_sequential<T, F>(output: &mut [T], block_size: usize, f: &F) -> Result<()>
where
    F: Fn(Block, &mut [T]) -> Result<()>,
{
    let blocks = BlockIterator::new(output.len(), block_size);
    for (block, chunk) in blocks.zip(output.chunks_mut(block_size)) {
        f(block, chunk).map_err(|source| Error::Worker {
            block: block.index,
            source: Box::new(source),
        })?;
    }
    Ok(())
}

#[cfg(feature = "parallel")]
fn run_parallel<T, F>(output: &mut [T], block_size: usize, f: &F) -> Result<()>
where
    T: Send,
    F: Fn(Block, &mut [T]) -> Result<()> + Sync,
{
    let results: Vec<Result<()>> = output
        .par_chunks_mut(block_size)
        .enumerate()
        .map(|(index, chunk)| f(Block::new(index, index * block_size, chunk.len()), chunk))
        .collect();
    first_failure(results)
}

/// Join all block results, keeping the lowest-numbered failure.
#[cfg(feature = "parallel")]
fn first_failure(results: Vec<Result<()>>) -> Result<()> {
    let failed = results.iter().filter(|r| r.is_err()).count();
    let first = results
        .into_iter()
        .enumerate()
        .find_map(|(block, r)| r.err().map(|e| (block, e)));

    match first {
        Some((block, source)) => {
            warn!(block, failed, error = %source, "parallel block failed, discarding output");
            Err(Error::Worker {
                block,
                source: Box::new(source),
            })
        }
        None => Ok(()),
    }
}

/// Get the number of available CPU cores
#[cfg(feature = "parallel")]
pub fn num_cpus() -> usize {
    rayon::current_num_threads()
}

/// Get the number of available CPU cores
#[cfg(not(feature = "parallel"))]
pub fn num_cpus() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}
