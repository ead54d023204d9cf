use shared::models::Job;
use shared::reorder::ReorderRequest;

/// Ordered job list as shown on the board
///
/// Positions are list indices; each job's `order` field holds the persisted
/// slot it is expected to occupy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    /// Build from jobs in any order; sorted by `order`
    pub fn new(mut jobs: Vec<Job>) -> Self {
        jobs.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        Self { jobs }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.jobs.iter().map(|job| job.id.as_str()).collect()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.jobs.iter().map(|job| job.title.as_str()).collect()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.jobs.iter().position(|job| job.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    /// Splice `id` out and reinsert it at `new_index`
    ///
    /// The slots the list occupies are kept and handed out again in the new
    /// sequence, which is exactly what the server-side shift will persist.
    /// Returns the moved list together with the request that persists it, or
    /// `None` if `id` is not in the list. `new_index` past the end means
    /// "last".
    pub fn moved(&self, id: &str, new_index: usize) -> Option<(JobList, ReorderRequest)> {
        let from_index = self.position(id)?;
        let to_index = new_index.min(self.jobs.len().saturating_sub(1));

        let slots: Vec<i32> = self.jobs.iter().map(|job| job.order).collect();
        let request = ReorderRequest::new(id, slots[from_index], slots[to_index]);

        let mut jobs = self.jobs.clone();
        let mover = jobs.remove(from_index);
        jobs.insert(to_index, mover);
        for (job, slot) in jobs.iter_mut().zip(slots) {
            job.order = slot;
        }

        Some((JobList { jobs }, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(ids: &[&str]) -> JobList {
        JobList::new(
            ids.iter()
                .enumerate()
                .map(|(idx, id)| Job {
                    id: id.to_string(),
                    title: id.to_string(),
                    slug: id.to_lowercase(),
                    status: Default::default(),
                    tags: vec![],
                    order: idx as i32,
                    created_at: 0,
                })
                .collect(),
        )
    }

    fn orders(list: &JobList) -> Vec<i32> {
        list.jobs().iter().map(|job| job.order).collect()
    }

    #[test]
    fn test_move_to_front() {
        let (moved, request) = list(&["A", "B", "C", "D"]).moved("C", 0).unwrap();
        assert_eq!(moved.ids(), vec!["C", "A", "B", "D"]);
        assert_eq!(orders(&moved), vec![0, 1, 2, 3]);
        assert_eq!(request, ReorderRequest::new("C", 2, 0));
    }

    #[test]
    fn test_move_down() {
        let (moved, request) = list(&["A", "B", "C", "D", "E"]).moved("B", 3).unwrap();
        assert_eq!(moved.ids(), vec!["A", "C", "D", "B", "E"]);
        assert_eq!(request, ReorderRequest::new("B", 1, 3));
        assert_eq!(moved.get("B").unwrap().order, 3);
    }

    #[test]
    fn test_index_past_end_clamps() {
        let (moved, request) = list(&["A", "B", "C"]).moved("A", 99).unwrap();
        assert_eq!(moved.ids(), vec!["B", "C", "A"]);
        assert_eq!(request.to_order, 2);
    }

    #[test]
    fn test_sparse_slots_are_reused() {
        let mut jobs = list(&["A", "B", "C"]).jobs().to_vec();
        jobs[1].order = 5;
        jobs[2].order = 9;
        let (moved, request) = JobList::new(jobs).moved("C", 0).unwrap();

        assert_eq!(moved.ids(), vec!["C", "A", "B"]);
        assert_eq!(orders(&moved), vec![0, 5, 9]);
        assert_eq!(request, ReorderRequest::new("C", 9, 0));
    }

    #[test]
    fn test_unknown_id() {
        assert!(list(&["A"]).moved("Z", 0).is_none());
    }
}
