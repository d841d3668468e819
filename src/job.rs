use std::{sync::Arc, thread};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct JobState {
    done: Mutex<bool>,
    signal: Condvar,
}

impl JobState {
    fn finish(&self) {
        *self.done.lock() = true;
        self.signal.notify_all();
    }

    fn wait(&self) {
        let mut done = self.done.lock();
        while !*done {
            self.signal.wait(&mut done);
        }
    }

    #[inline]
    fn is_done(&self) -> bool {
        *self.done.lock()
    }
}

/// Marks its job finished when dropped, including while unwinding.
struct FinishOnDrop(Arc<JobState>);

impl Drop for FinishOnDrop {
    fn drop(&mut self) {
        self.0.finish();
    }
}

#[derive(Debug, Clone)]
enum Job {
    Done,
    Pending(Arc<JobState>),
    All(Arc<[JobHandle]>),
}

/// A handle to a unit of work which may still be running.
///
/// Handles form a dependency graph: a job started with [spawn](Self::spawn) waits for its
/// dependency before running, and [combine](Self::combine) joins several handles into one.
/// Jobs can't be cancelled; once started, they run to completion.
#[derive(Debug, Clone)]
#[must_use = "dropping a JobHandle doesn't wait for its job"]
pub struct JobHandle(Job);

impl Default for JobHandle {
    fn default() -> Self {
        Self::completed()
    }
}

impl JobHandle {
    /// A handle with nothing to wait for.
    #[inline]
    pub const fn completed() -> Self {
        Self(Job::Done)
    }

    /// Run `job` on a new thread once `dependency` has completed.
    ///
    /// The returned handle completes when `job` returns or panics.
    pub fn spawn<F>(dependency: JobHandle, job: F) -> std::io::Result<Self>
    where
        F: FnOnce() + Send + 'static,
    {
        let state = Arc::new(JobState::default());
        let guard = FinishOnDrop(state.clone());
        thread::Builder::new()
            .name("polydetail-job".to_owned())
            .spawn(move || {
                let _guard = guard;
                dependency.complete();
                job();
            })?;
        Ok(Self(Job::Pending(state)))
    }

    /// A handle which completes once every one of `handles` has.
    pub fn combine(handles: impl IntoIterator<Item = JobHandle>) -> Self {
        let mut pending: Vec<JobHandle> = handles
            .into_iter()
            .filter(|h| !matches!(h.0, Job::Done))
            .collect();
        match pending.len() {
            0 => Self::completed(),
            1 => pending.swap_remove(0),
            _ => Self(Job::All(pending.into())),
        }
    }

    pub fn is_completed(&self) -> bool {
        match &self.0 {
            Job::Done => true,
            Job::Pending(state) => state.is_done(),
            Job::All(handles) => handles.iter().all(JobHandle::is_completed),
        }
    }

    /// Block until this job and everything it depends on has finished.
    pub fn complete(&self) {
        match &self.0 {
            Job::Done => {}
            Job::Pending(state) => state.wait(),
            Job::All(handles) => handles.iter().for_each(JobHandle::complete),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc,
    };

    use super::*;

    #[test]
    fn dependencies_run_first() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (release, gate) = mpsc::channel::<()>();

        let first = {
            let order = order.clone();
            JobHandle::spawn(JobHandle::completed(), move || {
                let _ = gate.recv();
                order.lock().push(1);
            })
            .unwrap()
        };
        let second = {
            let order = order.clone();
            JobHandle::spawn(first.clone(), move || order.lock().push(2)).unwrap()
        };
        assert!(!second.is_completed());
        release.send(()).unwrap();
        second.complete();
        assert!(first.is_completed());
        assert_eq!(*order.lock(), vec![1, 2]);
    }

    #[test]
    fn combine_waits_for_all() {
        let counter = Arc::new(AtomicUsize::new(0));
        let handles: Vec<JobHandle> = (0..4)
            .map(|_| {
                let counter = counter.clone();
                JobHandle::spawn(JobHandle::completed(), move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap()
            })
            .collect();
        let all = JobHandle::combine(handles.into_iter().chain([JobHandle::completed()]));
        all.complete();
        assert!(all.is_completed());
        assert_eq!(counter.load(Ordering::SeqCst), 4);
        assert!(JobHandle::combine([]).is_completed());
    }

    #[test]
    fn panicking_job_completes() {
        let handle = JobHandle::spawn(JobHandle::completed(), || panic!("job failed")).unwrap();
        handle.complete();
        assert!(handle.is_completed());
    }
}
