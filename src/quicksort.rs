//! The quicksort loop and its two branchless Lomuto partition schemes.
//!
//! Both schemes move elements through a one-slot gap: the gap element is
//! overwritten by the scan element, the scan element is overwritten from
//! the gap, and the split boundary advances by zero or one through an
//! arithmetic increment rather than a branch.

use core::ptr;

use crate::heapsort::heapsort;
use crate::pivot::select_pivot;
use crate::smallsort::insertion_sort;
use crate::{Scalar, INSERTION_THRESHOLD, LARGE_DATA_THRESHOLD};

/// Sorts the inclusive range `[low, high]`.
///
/// The left half of every partition recurses; the right half continues the
/// loop, so recursion depth tracks only the left descents. `height` is the
/// remaining budget of unbalanced partitions: it starts at `floor(log2 n)`,
/// drops by one whenever a partition comes out badly skewed, and once it is
/// negative the range is handed to heapsort, which bounds the worst case at
/// `O(n * log(n))`.
///
/// The `ROOT` instantiation postpones the small-range and depth checks
/// until after its first partition. A range of at least
/// `INSERTION_THRESHOLD` elements is therefore always partitioned at least
/// once, which is what makes the unguarded insertion sort safe on the
/// root's iterative tail.
///
/// # Safety
///
/// `low <= high` must delimit a valid inclusive range. When `leftmost` is
/// false, `low - 1` must be readable and its value must compare `<=` every
/// element of the range.
pub(crate) unsafe fn quicksort<T: Scalar, const ROOT: bool>(
    mut leftmost: bool,
    mut low: *mut T,
    high: *mut T,
    mut height: i32,
) {
    debug_assert!(low <= high);

    let mut x = high.offset_from(low) as usize;

    loop {
        // Non-root ranges handle both cutoffs up front; the root defers
        // them to the bottom of its first iteration.
        if !ROOT {
            if x < INSERTION_THRESHOLD {
                insertion_sort::<T, false>(leftmost, low, high);
                return;
            }

            if height < 0 {
                heapsort(low, high);
                return;
            }
        }

        let samples = select_pivot(low, high, x);

        // If a middle candidate equals the rightmost element of the
        // partition at left, duplicates of that value are common here.
        // Grouping them against the left edge puts them all in final
        // position at once, which keeps inputs made of equal runs linear
        // instead of quadratic.
        if !leftmost {
            let h = *low.sub(1);
            if h == *samples.sl || h == *samples.mid || h == *samples.sr {
                low = partition_equal(low, high, h);
                if low >= high {
                    return;
                }
                x = high.offset_from(low) as usize;
                continue;
            }
        }

        let p = *samples.mid;

        // The center scheme stops its scans with a `p - 1` sentinel, and no
        // such value exists when the pivot is the type minimum. Everything
        // compares `>= p` then, so group the equal run left and continue,
        // like the duplicate path above.
        if p == T::MIN {
            low = partition_equal(low, high, p);
            if low >= high {
                return;
            }
            x = high.offset_from(low) as usize;
            leftmost = false;
            continue;
        }

        let (l, work) = partition_center(low, high, samples.mid, x);

        // Exclude the placed pivot from both halves.
        let g = l.add((l < high) as usize);
        let l = l.sub((l > low) as usize);

        let _8th = x >> 3;

        let ls = l.offset_from(low) as usize;
        let gs = high.offset_from(g) as usize;

        let mut sort_left = true;

        if ls >= _8th && gs >= _8th {
            // Fairly balanced. If the pre-partition scans already covered
            // at least half the interval, little was out of place and the
            // halves are probably nearly sorted: try insertion sort, and
            // partition any half whose move budget runs out after all.
            if !work {
                if insertion_sort::<T, true>(leftmost, low, l) {
                    sort_left = false;
                    if insertion_sort::<T, true>(false, g, high) {
                        return;
                    }
                }
            }
        } else {
            // Badly skewed. Perturb both halves to break the pattern that
            // produced the skew, and burn one unit of depth budget.
            scramble(low, l, ls);
            scramble(g, high, gs);
            height -= 1;
        }

        if sort_left {
            quicksort::<T, false>(leftmost, low, l, height);
        }

        // Iterate on the right half.
        low = g;
        x = high.offset_from(low) as usize;

        if ROOT {
            // The root has partitioned by now, so its tail is never
            // leftmost and the cutoffs it skipped at loop top apply here.
            if x < INSERTION_THRESHOLD {
                insertion_sort::<T, false>(false, low, high);
                return;
            }

            if height < 0 {
                heapsort(low, high);
                return;
            }
        }

        leftmost = false;
    }
}

/// Branchless Lomuto partition of `[low, high]` around the pivot value at
/// `mid`, splitting into `< p` and `>= p`.
///
/// Returns the final pivot position `l` (`*l == p`, everything left of `l`
/// is `< p`, everything right of it is `>= p`) and whether the two
/// pre-partition scans met before covering half of the interval.
///
/// # Safety
///
/// `low <= mid <= high` with `x == high - low`, and `*mid` must not be the
/// type minimum.
unsafe fn partition_center<T: Scalar>(
    low: *mut T,
    high: *mut T,
    mid: *mut T,
    x: usize,
) -> (*mut T, bool) {
    debug_assert!(low <= mid && mid <= high);

    let p = *mid;

    // Skip a prefix that is already in place. `*mid == p` stops this scan
    // at the midpoint at the latest.
    let mut l = low;
    while *l < p {
        l = l.add(1);
    }

    // Park the stopped element in the pivot slot and plant `p - 1` in the
    // gap: every later leftward scan now stops at `l` without a bounds
    // check. The pivot is swapped back in when the gap closes.
    *mid = *l;
    *l = p.one_below();

    // Skip a suffix that is already in place; the sentinel bounds this
    // scan.
    let mut k = high.add(1);
    loop {
        k = k.sub(1);
        if *k < p {
            break;
        }
    }

    let work = ((l.offset_from(low) + high.offset_from(k)) as usize) < (x >> 1);

    let mut g = l;
    while g < k {
        *g = *l;
        g = g.add(1);
        *l = *g;
        l = l.add((*l < p) as usize);
    }

    // Close the gap and restore the pivot.
    *g = *l;
    *l = p;

    (l, work)
}

/// Branchless Lomuto partition of `[low, high]` splitting `== h` from
/// `> h`, for ranges known to be dominated by `h` from below.
///
/// Returns the first position strictly greater than `h`; everything before
/// it equals `h` and is in final position.
///
/// # Safety
///
/// `low <= high`, every element of the range must compare `>= h`, and at
/// least one element must equal `h`.
unsafe fn partition_equal<T: Scalar>(low: *mut T, high: *mut T, h: T) -> *mut T {
    debug_assert!(low <= high);

    // Find the rightmost element equal to `h` and replace it with a value
    // that differs from `h`, so the equality scan below needs no bounds
    // check. The slot is restored before the gap loop runs.
    let mut g = high.add(1);
    loop {
        g = g.sub(1);
        if !(*g > h) {
            break;
        }
    }

    let e = *g;
    *g = h.one_above();

    let mut l = low;
    while *l == h {
        l = l.add(1);
    }

    *g = e;

    let mut k = l;
    let p = *l;
    while k < g {
        *k = *l;
        k = k.add(1);
        *l = *k;
        l = l.add((*l == h) as usize);
    }
    *k = *l;
    *l = p;
    l = l.add((p == h) as usize);

    l
}

/// Swaps a fixed handful of elements between the quartiles of a range whose
/// partition came out badly skewed, so the retry does not resample the same
/// adversarial pattern. Two swaps normally, six on ranges wider than
/// [`LARGE_DATA_THRESHOLD`].
///
/// `len` is the pointer distance `high - low`. Narrow ranges are left
/// alone; insertion sort deals with them anyway.
///
/// # Safety
///
/// `[low, high]` must be a valid inclusive range with `len == high - low`.
unsafe fn scramble<T: Scalar>(low: *mut T, high: *mut T, len: usize) {
    if len >= INSERTION_THRESHOLD {
        let q = len >> 2;

        ptr::swap(low, low.add(q));
        ptr::swap(high, high.sub(q));

        if len > LARGE_DATA_THRESHOLD {
            ptr::swap(low.add(1), low.add(q + 1));
            ptr::swap(low.add(2), low.add(q + 2));
            ptr::swap(high.sub(2), high.sub(q + 2));
            ptr::swap(high.sub(1), high.sub(q + 1));
        }
    }
}
